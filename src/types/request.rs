use serde::Serialize;

/// Default width and height when the client does not send one.
pub const DEFAULT_DIMENSION: u32 = 512;
pub const DEFAULT_STEPS: u32 = 28;
pub const DEFAULT_CFG_SCALE: f64 = 7.0;

/// Provider-specific fallbacks used by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub model: String,
    pub sampler: String,
}

impl RequestDefaults {
    pub fn new(model: impl Into<String>, sampler: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            sampler: sampler.into(),
        }
    }
}

/// A fully defaulted generation request, independent of any provider's wire schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub model: String,
    /// Advisory range 1..=100; passed through unchanged.
    pub steps: u32,
    pub cfg_scale: f64,
    pub width: u32,
    pub height: u32,
    pub seed: Option<i64>,
    pub sampler: String,
    /// Set when the client sent a usable width or height.
    #[serde(skip)]
    pub dimensions_supplied: bool,
}

impl GenerationRequest {
    /// Create a request with every optional field at its default.
    pub fn new(prompt: impl Into<String>, defaults: &RequestDefaults) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: String::new(),
            model: defaults.model.clone(),
            steps: DEFAULT_STEPS,
            cfg_scale: DEFAULT_CFG_SCALE,
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            seed: None,
            sampler: defaults.sampler.clone(),
            dimensions_supplied: false,
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = negative_prompt.into();
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self.dimensions_supplied = true;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The negative prompt, if the client sent a non-blank one.
    pub fn negative_prompt(&self) -> Option<&str> {
        let trimmed = self.negative_prompt.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Coarse aspect-ratio bucket for providers that take a hint instead of pixels.
    ///
    /// Returns `None` when the client specified neither width nor height.
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.dimensions_supplied
            .then(|| AspectRatio::from_dimensions(self.width, self.height))
    }
}

/// Aspect-ratio buckets understood by conversational image models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Square,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        match width.cmp(&height) {
            std::cmp::Ordering::Equal => AspectRatio::Square,
            std::cmp::Ordering::Greater => AspectRatio::Landscape,
            std::cmp::Ordering::Less => AspectRatio::Portrait,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}
