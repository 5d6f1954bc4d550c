//! Reactive applier: writes resolved palettes to shared presentation state
//! and, in auto mode, keeps them current with the OS color-scheme preference.
//!
//! The shared state is an explicit handle owned by whoever constructs the
//! [`ThemeApplier`]; the applier is its only writer. Consumers clone the
//! handle and read. One listener per theme session: dispose the previous
//! [`ListenerGuard`] before calling [`ThemeApplier::listen`] again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use crate::theme::{resolve, ResolvedTheme, ThemeMode};

/// The four presentation values every consumer reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppliedTheme {
    pub background: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub dark: bool,
}

/// Shared handle to the applied presentation state.
pub type SharedTheme = Arc<RwLock<AppliedTheme>>;

/// Callback invoked with the new "prefers dark" value on each change.
pub type PreferenceCallback = Box<dyn Fn(bool) + Send>;

/// Read side of the host's light/dark preference. The engine only ever
/// reads this signal; it never owns or writes it.
pub trait PreferenceSource {
    /// Current "prefers dark" state.
    fn prefers_dark(&self) -> bool;

    /// Start delivering change notifications. `None` means the host cannot
    /// watch for changes; subscription then degrades to a no-op.
    fn watch(&self, on_change: PreferenceCallback) -> Option<PreferenceWatch>;
}

/// Handle to an active preference watch. Cancelling (or dropping) stops it.
pub struct PreferenceWatch {
    stop: Arc<AtomicBool>,
}

impl PreferenceWatch {
    fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for PreferenceWatch {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Poll `probe` on a background thread, firing `on_change` on transitions.
/// The thread exits on its next tick after the watch is cancelled.
fn spawn_poll_watch(
    probe: impl Fn() -> bool + Send + 'static,
    interval: Duration,
    on_change: PreferenceCallback,
) -> PreferenceWatch {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    // Baseline before the thread starts: a flip between registration and the
    // thread's first sample must count as a change, not as the baseline.
    let mut last = probe();

    thread::spawn(move || {
        while !stop_flag.load(Ordering::Relaxed) {
            thread::sleep(interval);
            let current = probe();
            if current != last {
                last = current;
                on_change(current);
            }
        }
    });

    PreferenceWatch { stop }
}

/// Current OS preference via the `dark-light` probe. An unknown or
/// unsupported platform counts as light.
pub fn system_prefers_dark() -> bool {
    matches!(dark_light::detect(), dark_light::Mode::Dark)
}

/// OS color-scheme preference. The OS exposes no portable change signal, so
/// watching polls the probe on a background thread.
#[derive(Debug, Clone)]
pub struct SystemPreference {
    poll_interval: Duration,
}

impl Default for SystemPreference {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(2) }
    }
}

impl SystemPreference {
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl PreferenceSource for SystemPreference {
    fn prefers_dark(&self) -> bool {
        system_prefers_dark()
    }

    fn watch(&self, on_change: PreferenceCallback) -> Option<PreferenceWatch> {
        Some(spawn_poll_watch(system_prefers_dark, self.poll_interval, on_change))
    }
}

/// Fixed preference that never changes. Used by tests and anywhere the
/// system signal should be ignored.
#[derive(Debug, Clone, Copy)]
pub struct FixedPreference(pub bool);

impl PreferenceSource for FixedPreference {
    fn prefers_dark(&self) -> bool {
        self.0
    }

    fn watch(&self, _on_change: PreferenceCallback) -> Option<PreferenceWatch> {
        None
    }
}

/// Disposer for a theme listener. Disposing is idempotent; dropping the
/// guard disposes too.
pub struct ListenerGuard {
    watch: Option<PreferenceWatch>,
}

impl ListenerGuard {
    fn noop() -> Self {
        Self { watch: None }
    }

    /// Whether an actual watch is registered. No-op guards return false.
    pub fn is_active(&self) -> bool {
        self.watch.is_some()
    }

    /// Stop the underlying watch. Safe to call any number of times.
    pub fn dispose(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.cancel();
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Sole writer of the shared presentation state.
pub struct ThemeApplier<S: PreferenceSource> {
    state: SharedTheme,
    source: S,
}

impl<S: PreferenceSource> ThemeApplier<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: Arc::new(RwLock::new(AppliedTheme::default())),
            source,
        }
    }

    /// Handle for consumers to read the applied values.
    pub fn state(&self) -> SharedTheme {
        Arc::clone(&self.state)
    }

    /// Resolve against the current preference and write all four values.
    pub fn apply(&self, mode: ThemeMode, accent: &str) -> ResolvedTheme {
        let resolved = resolve(mode, accent, self.source.prefers_dark());
        write_state(&self.state, &resolved);
        tracing::debug!(accent, mode = %mode, dark = resolved.mode.is_dark(), "applied theme");
        resolved
    }

    /// In `Auto` mode, register exactly one preference listener that
    /// recomputes and re-applies on every change, then invokes `on_change`.
    /// Any other mode registers nothing and returns a no-op guard.
    pub fn listen(
        &self,
        mode: ThemeMode,
        accent: &str,
        on_change: Option<Box<dyn Fn(&ResolvedTheme) + Send>>,
    ) -> ListenerGuard {
        if mode != ThemeMode::Auto {
            return ListenerGuard::noop();
        }

        let state = Arc::clone(&self.state);
        let accent = accent.to_string();
        let watch = self.source.watch(Box::new(move |prefers_dark| {
            let resolved = resolve(ThemeMode::Auto, &accent, prefers_dark);
            write_state(&state, &resolved);
            tracing::debug!(prefers_dark, "system preference changed, theme re-applied");
            if let Some(cb) = &on_change {
                cb(&resolved);
            }
        }));

        ListenerGuard { watch }
    }
}

fn write_state(state: &SharedTheme, resolved: &ResolvedTheme) {
    let mut applied = state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    applied.background = resolved.background.clone();
    applied.text_primary = resolved.text_primary.clone();
    applied.text_secondary = resolved.text_secondary.clone();
    applied.dark = resolved.mode.is_dark();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{DARK_BACKGROUND, LIGHT_BACKGROUND};
    use std::sync::mpsc;

    /// Toggleable preference with a fast poll loop, for exercising the
    /// subscription path without the OS.
    #[derive(Clone)]
    struct TogglePreference {
        value: Arc<AtomicBool>,
        poll_interval: Duration,
    }

    impl TogglePreference {
        fn new(dark: bool) -> Self {
            Self {
                value: Arc::new(AtomicBool::new(dark)),
                poll_interval: Duration::from_millis(5),
            }
        }

        fn with_poll_interval(dark: bool, poll_interval: Duration) -> Self {
            Self { value: Arc::new(AtomicBool::new(dark)), poll_interval }
        }

        fn set(&self, dark: bool) {
            self.value.store(dark, Ordering::Relaxed);
        }
    }

    impl PreferenceSource for TogglePreference {
        fn prefers_dark(&self) -> bool {
            self.value.load(Ordering::Relaxed)
        }

        fn watch(&self, on_change: PreferenceCallback) -> Option<PreferenceWatch> {
            let value = Arc::clone(&self.value);
            Some(spawn_poll_watch(
                move || value.load(Ordering::Relaxed),
                self.poll_interval,
                on_change,
            ))
        }
    }

    #[test]
    fn test_apply_writes_all_four_values() {
        let applier = ThemeApplier::new(FixedPreference(false));
        applier.apply(ThemeMode::Light, "#336699");

        let state = applier.state();
        let applied = state.read().unwrap();
        assert_eq!(applied.background, LIGHT_BACKGROUND);
        assert!(!applied.text_primary.is_empty());
        assert!(!applied.text_secondary.is_empty());
        assert!(!applied.dark);
    }

    #[test]
    fn test_apply_auto_follows_source() {
        let applier = ThemeApplier::new(FixedPreference(true));
        applier.apply(ThemeMode::Auto, "#336699");
        let state = applier.state();
        assert!(state.read().unwrap().dark);
        assert_eq!(state.read().unwrap().background, DARK_BACKGROUND);
    }

    #[test]
    fn test_listen_non_auto_is_noop() {
        let applier = ThemeApplier::new(FixedPreference(false));
        let mut guard = applier.listen(ThemeMode::Light, "#112233", None);
        assert!(!guard.is_active());
        // Disposing a no-op guard is safe, twice over
        guard.dispose();
        guard.dispose();
    }

    #[test]
    fn test_listen_auto_reapplies_on_flip() {
        let source = TogglePreference::new(false);
        let applier = ThemeApplier::new(source.clone());
        applier.apply(ThemeMode::Auto, "#336699");

        let (tx, rx) = mpsc::channel();
        let mut guard = applier.listen(
            ThemeMode::Auto,
            "#336699",
            Some(Box::new(move |resolved: &ResolvedTheme| {
                let _ = tx.send(resolved.mode.is_dark());
            })),
        );
        assert!(guard.is_active());

        source.set(true);
        let became_dark = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(became_dark);

        let state = applier.state();
        assert!(state.read().unwrap().dark);
        assert_eq!(state.read().unwrap().background, DARK_BACKGROUND);

        guard.dispose();
        guard.dispose(); // idempotent
    }

    #[test]
    fn test_flip_right_after_listen_is_reported() {
        // The baseline must be sampled before listen() returns. A flip that
        // lands before the watch thread's first tick is a change to report,
        // not a new baseline.
        let source = TogglePreference::with_poll_interval(false, Duration::from_millis(50));
        let applier = ThemeApplier::new(source.clone());

        let (tx, rx) = mpsc::channel();
        let _guard = applier.listen(
            ThemeMode::Auto,
            "#336699",
            Some(Box::new(move |resolved: &ResolvedTheme| {
                let _ = tx.send(resolved.mode.is_dark());
            })),
        );
        // No sleep: flip before the thread can possibly have sampled
        source.set(true);

        let became_dark = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(became_dark);
    }

    #[test]
    fn test_disposed_listener_stops_firing() {
        let source = TogglePreference::new(false);
        let applier = ThemeApplier::new(source.clone());

        let (tx, rx) = mpsc::channel();
        let mut guard = applier.listen(
            ThemeMode::Auto,
            "#336699",
            Some(Box::new(move |resolved: &ResolvedTheme| {
                let _ = tx.send(resolved.mode.is_dark());
            })),
        );

        guard.dispose();
        // Give the poll thread time to observe the cancel, then flip
        thread::sleep(Duration::from_millis(30));
        source.set(true);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_dropping_guard_disposes() {
        let source = TogglePreference::new(false);
        let applier = ThemeApplier::new(source.clone());

        let (tx, rx) = mpsc::channel();
        {
            let _guard = applier.listen(
                ThemeMode::Auto,
                "#336699",
                Some(Box::new(move |resolved: &ResolvedTheme| {
                    let _ = tx.send(resolved.mode.is_dark());
                })),
            );
        }
        thread::sleep(Duration::from_millis(30));
        source.set(true);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
