use services::{Navigator, Notice, Notifier};

/// Prints notices the way a toast would show them.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let marker = if notice.is_error() { "✗" } else { "✓" };
        println!("{marker} {}", notice.message());
    }
}

/// There is no router in a terminal; the route is printed so the learner can
/// open it next.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        println!("→ {path}");
    }
}
