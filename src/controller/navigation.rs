//! Page navigation strategy
//!
//! Depending on the active rendering backend, `set_page` either issues an
//! imperative native command or updates the declarative `page` prop. The
//! two code paths live behind one trait, chosen once at construction
//! instead of branching on a backend flag at every call site.

/// The navigation action the embedder must carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationRequest {
    /// Invoke the native `setNativePage` command with this 1-based page
    NativeCommand { page: usize },
    /// Update the declarative `page` prop to this 1-based page
    PropUpdate { page: usize },
}

/// The rendering backend in use, which dictates the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderBackend {
    /// Command-capable native component
    Native,
    /// Prop-driven composed view
    Composed,
}

/// Strategy seam for applying a page navigation.
pub trait PageNavigator {
    fn apply(&self, page: usize) -> NavigationRequest;
}

/// Issues imperative native commands.
pub struct ImperativeNavigator;

impl PageNavigator for ImperativeNavigator {
    fn apply(&self, page: usize) -> NavigationRequest {
        NavigationRequest::NativeCommand { page }
    }
}

/// Updates the declarative page prop.
pub struct DeclarativeNavigator;

impl PageNavigator for DeclarativeNavigator {
    fn apply(&self, page: usize) -> NavigationRequest {
        NavigationRequest::PropUpdate { page }
    }
}

/// Pick the navigator for a backend.
#[must_use]
pub fn navigator_for(backend: RenderBackend) -> Box<dyn PageNavigator + Send> {
    match backend {
        RenderBackend::Native => Box::new(ImperativeNavigator),
        RenderBackend::Composed => Box::new(DeclarativeNavigator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_selects_the_navigation_path() {
        let native = navigator_for(RenderBackend::Native);
        assert_eq!(native.apply(5), NavigationRequest::NativeCommand { page: 5 });

        let composed = navigator_for(RenderBackend::Composed);
        assert_eq!(composed.apply(5), NavigationRequest::PropUpdate { page: 5 });
    }
}
