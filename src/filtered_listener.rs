use crate::device::{Device, DeviceListener};
use crate::event::Component;

/// Wraps a listener and forwards only the changes a predicate accepts.
///
/// ```
/// use padwatch::{ComponentKind, FilteredListener, Logger};
///
/// let buttons_only = FilteredListener::new(
///     |c| c.kind() == ComponentKind::Button,
///     Box::new(Logger::new()),
/// );
/// # let _ = buttons_only;
/// ```
pub struct FilteredListener {
    predicate: Box<dyn Fn(Component) -> bool>,
    inner: Box<dyn DeviceListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl Fn(Component) -> bool + 'static,
        inner: Box<dyn DeviceListener>,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner,
        }
    }
}

impl DeviceListener for FilteredListener {
    fn on_component_changed(&mut self, device: &Device, component: Component) {
        if (self.predicate)(component) {
            self.inner.on_component_changed(device, component);
        }
    }
}
