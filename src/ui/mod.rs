/// Stateless view helpers
///
/// - Card container and primary button (widgets.rs)
/// - Blocking notification overlay (notification.rs)

pub mod notification;
pub mod widgets;
