//! 翻訳バインディングの生成元となる共有コンテキスト

use std::path::Path;
use std::sync::Arc;

use crate::binding::{
    TranslateDirective,
    TranslatePipe,
};
use crate::config::{
    AdapterSettings,
    ConfigError,
    load_settings,
};
use crate::error::TranslateError;
use crate::prefix::PrefixScope;
use crate::provider::TranslationProvider;

/// プロバイダー、設定、ルートスコープをまとめて保持する
///
/// バインディングはここから作成し、設定値とルートプレフィックスを引き継ぐ。
pub struct TranslateContext {
    /// 全バインディングで共有するプロバイダー
    provider: Arc<dyn TranslationProvider>,
    /// 検証済みの設定
    settings: AdapterSettings,
    /// `rootPrefix` から始まるトップレベルのスコープ
    root: Arc<PrefixScope>,
}

impl TranslateContext {
    /// 設定を検証してコンテキストを作成
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn new(
        provider: Arc<dyn TranslationProvider>,
        settings: AdapterSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        let root = Arc::new(PrefixScope::from_settings(&settings));
        Ok(Self { provider, settings, root })
    }

    /// `dir` の設定ファイルからコンテキストを作成
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn from_dir(provider: Arc<dyn TranslationProvider>, dir: &Path) -> Result<Self, ConfigError> {
        Self::new(provider, load_settings(dir)?)
    }

    /// 現在の設定
    #[must_use]
    pub const fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// トップレベルのスコープ
    #[must_use]
    pub const fn root_scope(&self) -> &Arc<PrefixScope> {
        &self.root
    }

    /// 設定を差し替える
    ///
    /// 無効な設定は拒否され、現在の設定が残る。ルートプレフィックスの変更は
    /// ルートスコープのバインディングに通知される。
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn update_settings(&mut self, settings: AdapterSettings) -> Result<(), ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.root.set_prefix(settings.root_prefix.clone());
        self.settings = settings;
        tracing::debug!("Settings updated: {:?}", self.settings);
        Ok(())
    }

    /// `dir` の設定ファイルを読み直す
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn reload(&mut self, dir: &Path) -> Result<(), ConfigError> {
        self.update_settings(load_settings(dir)?)
    }

    /// ルートスコープで解決するパイプを作成
    ///
    /// # Errors
    /// - Tokio ランタイム外での呼び出し
    pub fn pipe(&self) -> Result<TranslatePipe, TranslateError> {
        self.pipe_in(&self.root)
    }

    /// `scope` で解決するパイプを作成
    ///
    /// # Errors
    /// - Tokio ランタイム外での呼び出し
    pub fn pipe_in(&self, scope: &Arc<PrefixScope>) -> Result<TranslatePipe, TranslateError> {
        TranslatePipe::new(Arc::clone(&self.provider), Some(Arc::clone(scope)))
    }

    /// ルートスコープの要素に対するディレクティブを作成し、購読を開始する
    ///
    /// # Errors
    /// - Tokio ランタイム外での呼び出し
    pub fn directive(&self, content: &str) -> Result<TranslateDirective, TranslateError> {
        self.directive_in(&self.root, content)
    }

    /// `scope` の要素に対するディレクティブを作成し、購読を開始する
    ///
    /// # Errors
    /// - Tokio ランタイム外での呼び出し
    pub fn directive_in(
        &self,
        scope: &Arc<PrefixScope>,
        content: &str,
    ) -> Result<TranslateDirective, TranslateError> {
        let mut directive = TranslateDirective::new(
            Arc::clone(&self.provider),
            Some(Arc::clone(scope)),
            content,
            &self.settings,
        )?;
        directive.on_init();
        Ok(directive)
    }
}

impl std::fmt::Debug for TranslateContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslateContext")
            .field("settings", &self.settings)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
