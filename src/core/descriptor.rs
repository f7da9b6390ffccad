//! Resource descriptors and origin derivation.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::core::{LoaderError, LoaderResult};

/// Callback fired once after a resource finishes loading.
pub type LoadedCallback = Arc<dyn Fn() + Send + Sync>;

/// Serialized tuple origin (`scheme://host[:port]`) used as the hint key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Origin(String);

impl Origin {
    /// Derive the origin of a fully qualified URL.
    ///
    /// Fails for unparseable input and for URLs with an opaque origin
    /// (`data:`, `blob:` without a host, etc.), which cannot be preconnected.
    pub fn from_url(input: &str) -> LoaderResult<Self> {
        let parsed = Url::parse(input).map_err(|e| LoaderError::malformed(input, e))?;
        Self::of(&parsed, input)
    }

    fn of(url: &Url, input: &str) -> LoaderResult<Self> {
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(LoaderError::malformed(input, "url has no network origin"));
        }
        Ok(Self(origin.ascii_serialization()))
    }

    /// Borrow the serialized origin.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attributes applied to the script element at attach time.
#[derive(Clone)]
pub struct ScriptAttributes {
    /// Element id.
    pub id: Option<String>,
    /// `async` flag.
    pub asynchronous: bool,
    /// `defer` flag.
    pub deferred: bool,
    /// Free-text tag carried into audit events (analytics, marketing, chat...).
    pub category: Option<String>,
    /// Fired once after a successful load.
    pub on_loaded: Option<LoadedCallback>,
}

impl Default for ScriptAttributes {
    fn default() -> Self {
        Self {
            id: None,
            asynchronous: true,
            deferred: false,
            category: None,
            on_loaded: None,
        }
    }
}

impl fmt::Debug for ScriptAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptAttributes")
            .field("id", &self.id)
            .field("asynchronous", &self.asynchronous)
            .field("deferred", &self.deferred)
            .field("category", &self.category)
            .field("on_loaded", &self.on_loaded.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// One loadable external resource.
///
/// The canonical locator doubles as the dedup key: two descriptors whose URLs
/// serialize identically are the same loadable unit.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    locator: String,
    origin: Origin,
    attributes: ScriptAttributes,
    related_origins: Vec<Origin>,
}

impl ResourceDescriptor {
    /// Parse a locator into a descriptor with default attributes.
    pub fn new(locator: impl AsRef<str>) -> LoaderResult<Self> {
        let input = locator.as_ref();
        let parsed = Url::parse(input).map_err(|e| LoaderError::malformed(input, e))?;
        let origin = Origin::of(&parsed, input)?;
        Ok(Self {
            locator: parsed.into(),
            origin,
            attributes: ScriptAttributes::default(),
            related_origins: Vec::new(),
        })
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.attributes.id = Some(id.into());
        self
    }

    /// Set the `async` flag.
    #[must_use]
    pub fn with_async(mut self, asynchronous: bool) -> Self {
        self.attributes.asynchronous = asynchronous;
        self
    }

    /// Set the `defer` flag.
    #[must_use]
    pub fn with_defer(mut self, deferred: bool) -> Self {
        self.attributes.deferred = deferred;
        self
    }

    /// Tag the resource with a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.attributes.category = Some(category.into());
        self
    }

    /// Register the callback fired after a successful load.
    #[must_use]
    pub fn on_loaded<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.attributes.on_loaded = Some(Arc::new(callback));
        self
    }

    /// Add an origin the resource will fetch from once running.
    ///
    /// Duplicates are ignored; insertion order is kept.
    pub fn with_related_origin(mut self, url: &str) -> LoaderResult<Self> {
        let origin = Origin::from_url(url)?;
        if !self.related_origins.contains(&origin) {
            self.related_origins.push(origin);
        }
        Ok(self)
    }

    /// Canonical locator (serialized URL).
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Origin of the locator.
    pub const fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Attributes applied at attach time.
    pub const fn attributes(&self) -> &ScriptAttributes {
        &self.attributes
    }

    /// Additional origins that receive connection hints.
    pub fn related_origins(&self) -> &[Origin] {
        &self.related_origins
    }

    /// Category tag, if any.
    pub fn category(&self) -> Option<&str> {
        self.attributes.category.as_deref()
    }

    /// Own origin followed by every related origin.
    pub(crate) fn hint_targets(&self) -> impl Iterator<Item = &Origin> {
        std::iter::once(&self.origin).chain(self.related_origins.iter())
    }
}
