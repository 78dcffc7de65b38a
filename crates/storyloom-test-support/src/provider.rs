//! Test providers — scripted `ContentProvider` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;
use storyloom_core::image::InlineImage;
use storyloom_core::provider::{
    AspectRatio, CharacterProfile, ContentProvider, ProfileInput, ProviderError, SceneDraft,
    SceneRequest,
};

/// Builds a non-ending scene draft with three choices.
#[must_use]
pub fn scene_draft(description: &str) -> SceneDraft {
    SceneDraft {
        description: description.to_owned(),
        image_prompt: format!("illustration of: {description}"),
        choices: vec!["Go left".to_owned(), "Go right".to_owned(), "Wait".to_owned()],
        is_ending: false,
    }
}

/// Builds a character profile with the given raw attributes.
#[must_use]
pub fn profile(name: &str, raw: [i64; 4]) -> CharacterProfile {
    CharacterProfile {
        name: name.to_owned(),
        appearance_description: format!("{name}, travel-worn and watchful"),
        strength: raw[0],
        dexterity: raw[1],
        intelligence: raw[2],
        charisma: raw[3],
    }
}

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// `generate_scene` with the request it received.
    Scene(SceneRequest),
    /// `generate_image` with its prompt and aspect ratio.
    Image(String, AspectRatio),
    /// `generate_character_profile` with its input.
    Profile(ProfileInput),
    /// `generate_short_text` with its prompt and length limit.
    ShortText(String, usize),
}

/// A provider that answers from per-operation queues and records every call
/// in order. An exhausted queue answers with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    scenes: Mutex<VecDeque<Result<SceneDraft, ProviderError>>>,
    images: Mutex<VecDeque<Result<Option<InlineImage>, ProviderError>>>,
    profiles: Mutex<VecDeque<Result<CharacterProfile, ProviderError>>>,
    short_texts: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl ScriptedProvider {
    /// Creates a provider with empty scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a scene response.
    #[must_use]
    pub fn with_scene(self, result: Result<SceneDraft, ProviderError>) -> Self {
        self.scenes.lock().unwrap().push_back(result);
        self
    }

    /// Queues an image response.
    #[must_use]
    pub fn with_image(self, result: Result<Option<InlineImage>, ProviderError>) -> Self {
        self.images.lock().unwrap().push_back(result);
        self
    }

    /// Queues a character-profile response.
    #[must_use]
    pub fn with_profile(self, result: Result<CharacterProfile, ProviderError>) -> Self {
        self.profiles.lock().unwrap().push_back(result);
        self
    }

    /// Queues a short-text response.
    #[must_use]
    pub fn with_short_text(self, result: Result<String, ProviderError>) -> Self {
        self.short_texts.lock().unwrap().push_back(result);
        self
    }

    /// Queues a scene response after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push_scene(&self, result: Result<SceneDraft, ProviderError>) {
        self.scenes.lock().unwrap().push_back(result);
    }

    /// Queues an image response after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push_image(&self, result: Result<Option<InlineImage>, ProviderError>) {
        self.images.lock().unwrap().push_back(result);
    }

    /// Returns every call made so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the scene requests received so far.
    pub fn scene_requests(&self) -> Vec<SceneRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Scene(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, ProviderError>>>, what: &str) -> Result<T, ProviderError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Transport(format!("no scripted {what} response"))))
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    async fn generate_scene(&self, request: &SceneRequest) -> Result<SceneDraft, ProviderError> {
        self.record(ProviderCall::Scene(request.clone()));
        Self::next(&self.scenes, "scene")
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<InlineImage>, ProviderError> {
        self.record(ProviderCall::Image(prompt.to_owned(), aspect_ratio));
        Self::next(&self.images, "image")
    }

    async fn generate_character_profile(
        &self,
        input: &ProfileInput,
    ) -> Result<CharacterProfile, ProviderError> {
        self.record(ProviderCall::Profile(input.clone()));
        Self::next(&self.profiles, "profile")
    }

    async fn generate_short_text(
        &self,
        prompt: &str,
        max_length: usize,
    ) -> Result<String, ProviderError> {
        self.record(ProviderCall::ShortText(prompt.to_owned(), max_length));
        Self::next(&self.short_texts, "short text")
    }
}

/// A provider whose every call fails with the configured error.
#[derive(Debug)]
pub struct FailingProvider(pub ProviderError);

#[async_trait]
impl ContentProvider for FailingProvider {
    async fn generate_scene(&self, _request: &SceneRequest) -> Result<SceneDraft, ProviderError> {
        Err(self.0.clone())
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _aspect_ratio: AspectRatio,
    ) -> Result<Option<InlineImage>, ProviderError> {
        Err(self.0.clone())
    }

    async fn generate_character_profile(
        &self,
        _input: &ProfileInput,
    ) -> Result<CharacterProfile, ProviderError> {
        Err(self.0.clone())
    }

    async fn generate_short_text(
        &self,
        _prompt: &str,
        _max_length: usize,
    ) -> Result<String, ProviderError> {
        Err(self.0.clone())
    }
}

/// Wraps a [`ScriptedProvider`] and holds every scene call until
/// [`GatedProvider::release`] is called, so a test can act while a turn is
/// in flight.
#[derive(Debug)]
pub struct GatedProvider {
    inner: ScriptedProvider,
    gate: Notify,
}

impl GatedProvider {
    /// Creates a gated provider around `inner`.
    #[must_use]
    pub fn new(inner: ScriptedProvider) -> Self {
        Self {
            inner,
            gate: Notify::new(),
        }
    }

    /// Lets one pending (or the next) scene call through.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// The wrapped provider, for inspecting calls.
    #[must_use]
    pub fn inner(&self) -> &ScriptedProvider {
        &self.inner
    }
}

#[async_trait]
impl ContentProvider for GatedProvider {
    async fn generate_scene(&self, request: &SceneRequest) -> Result<SceneDraft, ProviderError> {
        self.gate.notified().await;
        self.inner.generate_scene(request).await
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<InlineImage>, ProviderError> {
        self.inner.generate_image(prompt, aspect_ratio).await
    }

    async fn generate_character_profile(
        &self,
        input: &ProfileInput,
    ) -> Result<CharacterProfile, ProviderError> {
        self.inner.generate_character_profile(input).await
    }

    async fn generate_short_text(
        &self,
        prompt: &str,
        max_length: usize,
    ) -> Result<String, ProviderError> {
        self.inner.generate_short_text(prompt, max_length).await
    }
}
