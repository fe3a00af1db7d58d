//! テスト用ユーティリティ
//!
//! バインディングのテストで使うインメモリのプロバイダーを提供します。
#![cfg(test)]

use std::collections::HashMap;
use std::sync::atomic::{
    AtomicBool,
    AtomicUsize,
    Ordering,
};
use std::sync::{
    Mutex,
    MutexGuard,
    PoisonError,
};

use futures::StreamExt;
use futures::channel::mpsc;
use tokio::sync::broadcast;

use crate::error::ProviderError;
use crate::provider::{
    DefaultInterpolator,
    Interpolate,
    ProviderEvent,
    Translation,
    TranslationProvider,
};
use crate::types::InterpolationParams;

/// 遅延配信待ちのリクエスト
struct PendingGet {
    /// 配信先
    sender: mpsc::UnboundedSender<Result<String, ProviderError>>,
    /// リクエスト時点で解決された値
    value: String,
}

/// インメモリの翻訳プロバイダー
pub(crate) struct FakeProvider {
    /// 言語 → キー → 翻訳
    catalog: Mutex<HashMap<String, HashMap<String, String>>>,
    /// 現在の言語
    language: Mutex<String>,
    /// 変更通知
    events: broadcast::Sender<ProviderEvent>,
    /// `true` の場合 `get` は `Pending` を返す
    deferred: AtomicBool,
    /// 配信待ちのリクエスト（発行順）
    pending: Mutex<Vec<PendingGet>>,
    /// `get` の呼び出し回数
    gets: AtomicUsize,
}

/// ポイズンを無視してロックを取得する
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeProvider {
    /// `language` を現在の言語とする空のカタログで作成
    pub(crate) fn new(language: &str) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            catalog: Mutex::new(HashMap::new()),
            language: Mutex::new(language.to_string()),
            events,
            deferred: AtomicBool::new(false),
            pending: Mutex::new(Vec::new()),
            gets: AtomicUsize::new(0),
        }
    }

    /// 以降の `get` を遅延配信にする
    pub(crate) fn deferred(self) -> Self {
        self.deferred.store(true, Ordering::SeqCst);
        self
    }

    /// 翻訳を登録して変更を通知する
    pub(crate) fn set_translation(&self, lang: &str, key: &str, value: &str) {
        lock(&self.catalog)
            .entry(lang.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        let _ = self.events.send(ProviderEvent::TranslationChanged { lang: lang.to_string() });
    }

    /// 現在の言語を切り替えて通知する
    pub(crate) fn use_language(&self, lang: &str) {
        *lock(&self.language) = lang.to_string();
        let _ = self.events.send(ProviderEvent::LanguageChanged { lang: lang.to_string() });
    }

    /// フォールバック言語の変更を通知する
    pub(crate) fn set_fallback_language(&self, lang: &str) {
        let _ = self
            .events
            .send(ProviderEvent::FallbackLanguageChanged { lang: lang.to_string() });
    }

    /// `get` の呼び出し回数
    pub(crate) fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// 発行済みの遅延リクエスト数
    pub(crate) fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// `index` 番目のリクエストに解決済みの値を配信する
    pub(crate) fn release(&self, index: usize) {
        if let Some(get) = lock(&self.pending).get(index) {
            let _ = get.sender.unbounded_send(Ok(get.value.clone()));
        }
    }

    /// `index` 番目のリクエストに任意の値を配信する
    pub(crate) fn emit(&self, index: usize, item: Result<String, ProviderError>) {
        if let Some(get) = lock(&self.pending).get(index) {
            let _ = get.sender.unbounded_send(item);
        }
    }

    /// 現在の言語で翻訳を引き、なければキーを返す
    fn lookup(&self, key: &str, params: Option<&InterpolationParams>) -> String {
        let language = lock(&self.language).clone();
        lock(&self.catalog)
            .get(&language)
            .and_then(|keys| keys.get(key))
            .and_then(|template| DefaultInterpolator.interpolate(template, params))
            .unwrap_or_else(|| key.to_string())
    }
}

impl TranslationProvider for FakeProvider {
    fn get(&self, key: &str, params: Option<&InterpolationParams>) -> Translation {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let value = self.lookup(key, params);
        if !self.deferred.load(Ordering::SeqCst) {
            return Translation::Ready(value);
        }

        let (sender, receiver) = mpsc::unbounded();
        lock(&self.pending).push(PendingGet { sender, value });
        Translation::Pending(receiver.boxed())
    }

    fn current_language(&self) -> String {
        lock(&self.language).clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// 生成されたタスクを実行させる
pub(crate) async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
