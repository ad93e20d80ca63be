//! Slide base documents, loaded lazily per presentation.

use std::collections::HashMap;
use std::sync::Arc;

use slidecast_common::error::SlidecastResult;
use slidecast_common::SlidecastError;
use slidecast_model::canvas::BaseDocument;
use slidecast_model::shape::WhiteboardId;

/// Provides the ordered slide documents of a presentation.
pub trait SlideSource {
    /// Load every slide of `presentation`, slide 1 first.
    fn load(&self, presentation: &str) -> SlidecastResult<Vec<BaseDocument>>;
}

impl<S: SlideSource + ?Sized> SlideSource for &S {
    fn load(&self, presentation: &str) -> SlidecastResult<Vec<BaseDocument>> {
        (**self).load(presentation)
    }
}

/// Slides held in memory, keyed by presentation id.
#[derive(Debug, Clone, Default)]
pub struct InMemorySlides {
    decks: HashMap<String, Vec<BaseDocument>>,
}

impl InMemorySlides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(mut self, presentation: impl Into<String>, slides: Vec<BaseDocument>) -> Self {
        self.decks.insert(presentation.into(), slides);
        self
    }
}

impl SlideSource for InMemorySlides {
    fn load(&self, presentation: &str) -> SlidecastResult<Vec<BaseDocument>> {
        self.decks
            .get(presentation)
            .cloned()
            .ok_or_else(|| SlidecastError::presentation(format!("unknown presentation {presentation}")))
    }
}

/// Why a slide could not be provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideLookupError {
    Unavailable { message: String },
    OutOfRange { available: usize },
}

/// Caches loaded presentations. A failed load is cached too, so a missing
/// presentation is only looked up once.
pub struct SlideLibrary<S> {
    source: S,
    decks: HashMap<String, Result<Vec<Arc<BaseDocument>>, String>>,
}

impl<S: SlideSource> SlideLibrary<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            decks: HashMap::new(),
        }
    }

    /// All slides of a presentation.
    pub fn deck(&mut self, presentation: &str) -> Result<&[Arc<BaseDocument>], SlideLookupError> {
        if !self.decks.contains_key(presentation) {
            let loaded = self
                .source
                .load(presentation)
                .map(|slides| {
                    tracing::debug!(presentation, slides = slides.len(), "Loaded presentation");
                    for (index, slide) in slides.iter().enumerate() {
                        if !slide.has_declared_size() {
                            tracing::warn!(
                                presentation,
                                slide = index + 1,
                                width = slide.canvas().width,
                                height = slide.canvas().height,
                                "Slide declares no size, using fallback canvas"
                            );
                        }
                    }
                    slides.into_iter().map(Arc::new).collect()
                })
                .map_err(|e| e.to_string());
            self.decks.insert(presentation.to_string(), loaded);
        }

        match self.decks.get(presentation) {
            Some(Ok(slides)) => Ok(slides.as_slice()),
            Some(Err(message)) => Err(SlideLookupError::Unavailable {
                message: message.clone(),
            }),
            None => Err(SlideLookupError::Unavailable {
                message: "not loaded".to_string(),
            }),
        }
    }

    /// The base document behind a whiteboard.
    pub fn slide(&mut self, whiteboard: &WhiteboardId) -> Result<Arc<BaseDocument>, SlideLookupError> {
        let deck = self.deck(whiteboard.presentation())?;
        let index = whiteboard.slide() as usize;
        deck.get(index.wrapping_sub(1))
            .cloned()
            .ok_or(SlideLookupError::OutOfRange {
                available: deck.len(),
            })
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
