//! Host runtime capabilities consumed by the scheduler.
//!
//! The scheduler never touches a real page directly. A browser binding, a
//! headless renderer, or the in-memory doubles in [`crate::infra::memory`]
//! implement these traits.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::core::{Origin, ResourceDescriptor};

/// Abstraction for spawning work on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Timer primitive used for fallback delays.
pub trait Timer: Send + Sync + 'static {
    /// Future completing after `delay`.
    fn delay(&self, delay: Duration) -> BoxFuture<'static, ()>;
}

/// `rel` value of a connection hint element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintRel {
    /// Full connection setup (DNS, TCP, TLS).
    Preconnect,
    /// DNS-only fallback for clients without preconnect.
    DnsPrefetch,
}

impl HintRel {
    /// Attribute value as written into the document.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preconnect => "preconnect",
            Self::DnsPrefetch => "dns-prefetch",
        }
    }
}

/// A `<link>` hint appended to the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHint {
    /// Hint kind.
    pub rel: HintRel,
    /// Origin the hint is scoped to.
    pub origin: Origin,
    /// Whether the `crossorigin` attribute is set.
    pub crossorigin: bool,
}

/// Script element as attached to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptElement {
    /// `src` attribute.
    pub src: String,
    /// `id` attribute.
    pub id: Option<String>,
    /// `async` attribute.
    pub asynchronous: bool,
    /// `defer` attribute.
    pub deferred: bool,
    /// `data-category` attribute.
    pub category: Option<String>,
}

impl From<&ResourceDescriptor> for ScriptElement {
    fn from(descriptor: &ResourceDescriptor) -> Self {
        let attrs = descriptor.attributes();
        Self {
            src: descriptor.locator().to_owned(),
            id: attrs.id.clone(),
            asynchronous: attrs.asynchronous,
            deferred: attrs.deferred,
            category: attrs.category.clone(),
        }
    }
}

/// Settles when the attached element fires its load or error event.
pub type PendingLoad = BoxFuture<'static, Result<(), String>>;

/// Document mutation surface.
pub trait Document: Send + Sync + 'static {
    /// Whether an element with this id is currently in the document.
    fn contains_element(&self, id: &str) -> bool;

    /// Append a hint element to the head.
    fn append_hint(&self, hint: ConnectionHint);

    /// Create and attach a script element.
    ///
    /// Attachment itself is synchronous; only the returned future waits on
    /// the network.
    fn attach_script(&self, element: ScriptElement) -> PendingLoad;
}

/// Idle-callback primitive.
pub trait IdleScheduler: Send + Sync + 'static {
    /// Request a callback for the next idle period.
    ///
    /// Returns `None` when the runtime has no idle signal.
    fn request_idle(&self) -> Option<BoxFuture<'static, ()>>;
}

/// Margin around the viewport inside which an element counts as near-visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootMargin {
    /// Absolute margin.
    Pixels(u32),
    /// Margin relative to the viewport size.
    Percent(u32),
}

impl FromStr for RootMargin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, build): (&str, fn(u32) -> Self) =
            if let Some(px) = s.strip_suffix("px") {
                (px, Self::Pixels)
            } else if let Some(pct) = s.strip_suffix('%') {
                (pct, Self::Percent)
            } else {
                return Err(format!("root margin `{s}` must end in px or %"));
            };
        digits
            .trim()
            .parse::<u32>()
            .map(build)
            .map_err(|e| format!("root margin `{s}`: {e}"))
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(n) => write!(f, "{n}px"),
            Self::Percent(n) => write!(f, "{n}%"),
        }
    }
}

/// A live intersection observation on one element.
#[async_trait]
pub trait ProximityObservation: Send {
    /// Wait until the element comes within the margin.
    ///
    /// Returns `false` if the observation ends without an entry.
    async fn approached(&mut self) -> bool;

    /// Stop observing.
    fn disconnect(&mut self);
}

/// Viewport-intersection primitive.
pub trait ViewportObserver: Send + Sync + 'static {
    /// Begin observing `element_id`. `None` when the runtime lacks the primitive.
    fn observe(
        &self,
        element_id: &str,
        margin: RootMargin,
    ) -> Option<Box<dyn ProximityObservation>>;
}

/// User gestures that count as first interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    /// `pointerdown`
    PointerDown,
    /// `keydown`
    KeyDown,
    /// `touchstart`
    TouchStart,
    /// `scroll`
    Scroll,
}

impl GestureKind {
    /// Every supported gesture.
    pub const ALL: [Self; 4] = [
        Self::PointerDown,
        Self::KeyDown,
        Self::TouchStart,
        Self::Scroll,
    ];

    /// DOM event name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::KeyDown => "keydown",
            Self::TouchStart => "touchstart",
            Self::Scroll => "scroll",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options passed when registering gesture listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Register in the capturing phase.
    pub capture: bool,
    /// Never calls `preventDefault`.
    pub passive: bool,
}

impl ListenerOptions {
    /// Capturing, passive listener.
    pub const CAPTURE_PASSIVE: Self = Self {
        capture: true,
        passive: true,
    };
}

/// A set of listeners registered by one `listen` call.
#[async_trait]
pub trait GestureSubscription: Send {
    /// Wait for the next gesture. `None` if the source went away.
    async fn next_gesture(&mut self) -> Option<GestureKind>;

    /// Remove every listener of this subscription.
    fn remove(&mut self);
}

/// Document-level gesture event stream.
pub trait GestureSource: Send + Sync + 'static {
    /// Register one listener per kind on the document.
    fn listen(
        &self,
        kinds: &[GestureKind],
        options: ListenerOptions,
    ) -> Box<dyn GestureSubscription>;
}

/// Runtime lacking idle, intersection and gesture primitives.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl IdleScheduler for Unsupported {
    fn request_idle(&self) -> Option<BoxFuture<'static, ()>> {
        None
    }
}

impl ViewportObserver for Unsupported {
    fn observe(
        &self,
        _element_id: &str,
        _margin: RootMargin,
    ) -> Option<Box<dyn ProximityObservation>> {
        None
    }
}

struct NeverGesture;

#[async_trait]
impl GestureSubscription for NeverGesture {
    async fn next_gesture(&mut self) -> Option<GestureKind> {
        futures::future::pending().await
    }

    fn remove(&mut self) {}
}

impl GestureSource for Unsupported {
    fn listen(
        &self,
        _kinds: &[GestureKind],
        _options: ListenerOptions,
    ) -> Box<dyn GestureSubscription> {
        Box::new(NeverGesture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_margin_parses_pixels_and_percent() {
        assert_eq!("200px".parse::<RootMargin>(), Ok(RootMargin::Pixels(200)));
        assert_eq!(" 10% ".parse::<RootMargin>(), Ok(RootMargin::Percent(10)));
        assert!("200".parse::<RootMargin>().is_err());
        assert!("-5px".parse::<RootMargin>().is_err());
        assert_eq!(RootMargin::Pixels(64).to_string(), "64px");
    }

    #[test]
    fn script_element_carries_attributes() {
        let desc = ResourceDescriptor::new("https://cdn.example.com/a.js")
            .unwrap()
            .with_id("analytics")
            .with_defer(true)
            .with_category("analytics");
        let el = ScriptElement::from(&desc);
        assert_eq!(el.src, "https://cdn.example.com/a.js");
        assert_eq!(el.id.as_deref(), Some("analytics"));
        assert!(el.asynchronous);
        assert!(el.deferred);
        assert_eq!(el.category.as_deref(), Some("analytics"));
    }

    #[test]
    fn gesture_names_match_dom_events() {
        let names: Vec<_> = GestureKind::ALL.iter().map(|g| g.as_str()).collect();
        assert_eq!(names, ["pointerdown", "keydown", "touchstart", "scroll"]);
        assert_eq!(HintRel::DnsPrefetch.as_str(), "dns-prefetch");
    }
}
