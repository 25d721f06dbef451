//! Input Injection Engine: taps, swipes, and key codes.
//!
//! Turns validated command arguments into an ordered, timed sequence of
//! synthetic events and hands them to the [`CapabilityBackend`] one by one.
//!
//! # Event timing (for beginners)
//!
//! Every pointer event carries two timestamps on the session clock:
//!
//! - `down_time` – when the finger touched the screen.  All events of one
//!   gesture share it, which is how the device knows they belong together.
//! - `event_time` – when this particular event happened.
//!
//! A swipe is paced in real time: after each MOVE the engine sleeps for one
//! step duration, so a 300 ms swipe really takes about 300 ms.  The sleep
//! races the session's [`CancellationToken`]; if shutdown is requested the
//! gesture stops where it is and reports [`GestureError::Cancelled`].
//!
//! Injected events are never rolled back: if an event fails midway, the
//! events already delivered stay delivered.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use touchbridge_core::protocol::args::{
    KeycodeAction, KeycodeArgs, SwipeArgs, TapArgs, DEFAULT_BUTTONS, DEFAULT_PRESSURE,
};
use touchbridge_core::{KeyCode, KeyEvent, MotionAction, PointerEvent, PointerState, SwipePlan};

use crate::application::capability::{CapabilityBackend, CapabilityError};
use crate::domain::config::DisplayId;

/// Error type for gesture and key injection.
#[derive(Debug, Error)]
pub enum GestureError {
    /// The backend failed to inject one of the events.
    #[error(transparent)]
    Injection(#[from] CapabilityError),
    /// `KEYCODE` carried an action other than `down`, `up` or `both`.
    #[error("unrecognised key action {0:?}")]
    UnknownKeyAction(String),
    /// Shutdown was requested while the gesture was in progress.
    #[error("gesture interrupted by shutdown")]
    Cancelled,
}

/// Session-scoped injector owning the single pointer.
pub struct InputInjector {
    backend: Arc<dyn CapabilityBackend>,
    display: DisplayId,
    pointer: PointerState,
    epoch: Instant,
    cancel: CancellationToken,
}

impl InputInjector {
    /// Creates an injector whose clock starts now.
    pub fn new(
        backend: Arc<dyn CapabilityBackend>,
        display: DisplayId,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            backend,
            display,
            pointer: PointerState::default(),
            epoch: Instant::now(),
            cancel,
        }
    }

    /// Milliseconds elapsed on the session clock.
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Injects one pointer event from the current pointer state.
    fn inject_pointer(
        &self,
        down_time: u64,
        event_time: u64,
        action: MotionAction,
        buttons: i32,
    ) -> Result<(), CapabilityError> {
        let event = PointerEvent::touch(down_time, event_time, action, &self.pointer, buttons);
        self.backend.inject_pointer_event(&event, self.display)
    }

    /// Taps at `(x, y)`: DOWN then UP at the same point.
    ///
    /// UP is injected even if DOWN failed, so a half-delivered tap never
    /// leaves the pointer pressed.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::Injection`] if either event failed.
    pub fn tap(&mut self, args: &TapArgs) -> Result<(), GestureError> {
        self.pointer.set_position(args.x, args.y, args.pressure);

        let down_time = self.now_ms();
        let down = self.inject_pointer(down_time, down_time, MotionAction::Down, args.buttons);
        if let Err(e) = &down {
            warn!(x = args.x, y = args.y, "tap DOWN failed: {e}");
        }

        let up_time = self.now_ms();
        let up = self.inject_pointer(down_time, up_time, MotionAction::Up, args.buttons);
        if let Err(e) = &up {
            warn!(x = args.x, y = args.y, "tap UP failed: {e}");
        }

        down.and(up)?;
        Ok(())
    }

    /// Swipes from `(x1, y1)` to `(x2, y2)` over `duration_ms`.
    ///
    /// The first failing event aborts the rest of the gesture.
    ///
    /// # Errors
    ///
    /// - [`GestureError::Injection`] if any event failed.
    /// - [`GestureError::Cancelled`] if shutdown was requested during pacing.
    pub async fn swipe(&mut self, args: &SwipeArgs) -> Result<(), GestureError> {
        let plan = SwipePlan::new((args.x1, args.y1), (args.x2, args.y2), args.duration_ms);
        let pace = Duration::from_millis(u64::from(plan.step_duration_ms()));
        debug!(
            steps = plan.steps(),
            step_ms = plan.step_duration_ms(),
            "swipe ({}, {}) -> ({}, {})",
            args.x1,
            args.y1,
            args.x2,
            args.y2
        );

        self.pointer.set_position(args.x1, args.y1, DEFAULT_PRESSURE);
        let down_time = self.now_ms();
        self.inject_pointer(down_time, down_time, MotionAction::Down, DEFAULT_BUTTONS)?;

        for step in plan.moves() {
            self.pointer.set_position(step.x, step.y, DEFAULT_PRESSURE);
            self.inject_pointer(
                down_time,
                down_time + step.offset_ms,
                MotionAction::Move,
                DEFAULT_BUTTONS,
            )?;
            self.pause(pace).await?;
        }

        self.pointer.set_position(args.x2, args.y2, DEFAULT_PRESSURE);
        let up_time = self.now_ms();
        self.inject_pointer(down_time, up_time, MotionAction::Up, DEFAULT_BUTTONS)?;
        Ok(())
    }

    /// Sleeps for `duration` unless the session is cancelled first.
    async fn pause(&self, duration: Duration) -> Result<(), GestureError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(GestureError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Injects a key transition, or a full press-release for `both`.
    ///
    /// # Errors
    ///
    /// - [`GestureError::UnknownKeyAction`] for an unrecognised action word.
    /// - [`GestureError::Injection`] if the backend failed.
    pub fn keycode(&self, args: &KeycodeArgs) -> Result<(), GestureError> {
        match &args.action {
            KeycodeAction::Down => self
                .backend
                .inject_key_event(&KeyEvent::down(args.code), self.display)?,
            KeycodeAction::Up => self
                .backend
                .inject_key_event(&KeyEvent::up(args.code), self.display)?,
            KeycodeAction::Both => self.press_release(args.code)?,
            KeycodeAction::Unrecognized(word) => {
                return Err(GestureError::UnknownKeyAction(word.clone()))
            }
        }
        Ok(())
    }

    /// Presses and releases `code`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] if the backend failed.
    pub fn press_release(&self, code: KeyCode) -> Result<(), CapabilityError> {
        self.backend.press_release_key(code, self.display)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::backend::MockCapabilityBackend;

    fn make_injector(backend: MockCapabilityBackend) -> (InputInjector, Arc<MockCapabilityBackend>) {
        let backend = Arc::new(backend);
        let injector = InputInjector::new(
            Arc::clone(&backend) as Arc<dyn CapabilityBackend>,
            DisplayId::PRIMARY,
            CancellationToken::new(),
        );
        (injector, backend)
    }

    fn swipe_args(x1: i32, y1: i32, x2: i32, y2: i32, duration_ms: i32) -> SwipeArgs {
        SwipeArgs { x1, y1, x2, y2, duration_ms }
    }

    // ── Tap ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_tap_injects_down_then_up_at_same_point() {
        // Arrange
        let (mut injector, backend) = make_injector(MockCapabilityBackend::new());
        let args = TapArgs { x: 100, y: 200, pressure: 0.5, buttons: 1 };

        // Act
        injector.tap(&args).unwrap();

        // Assert
        let events = backend.pointer_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, MotionAction::Down);
        assert_eq!(events[1].action, MotionAction::Up);
        for event in &events {
            assert_eq!((event.x(), event.y()), (100.0, 200.0));
            assert_eq!(event.pointer.coords.pressure, 0.5);
            assert_eq!(event.buttons, 1);
            assert_eq!(event.down_time, events[0].down_time);
        }
    }

    #[test]
    fn test_tap_still_injects_up_when_down_fails() {
        // Arrange – every injection fails
        let (mut injector, backend) = make_injector(MockCapabilityBackend::new().with_fail_after(0));
        let args = TapArgs { x: 1, y: 1, pressure: 1.0, buttons: 0 };

        // Act
        let result = injector.tap(&args);

        // Assert – both attempts were made
        assert!(matches!(result, Err(GestureError::Injection(_))));
        assert_eq!(backend.injection_attempts(), 2);
    }

    #[test]
    fn test_tap_fails_when_only_up_fails() {
        let (mut injector, backend) = make_injector(MockCapabilityBackend::new().with_fail_after(1));
        let args = TapArgs { x: 1, y: 1, pressure: 1.0, buttons: 0 };

        assert!(injector.tap(&args).is_err());
        assert_eq!(backend.pointer_events().len(), 1);
    }

    // ── Swipe ─────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_swipe_is_down_then_up() {
        // Arrange
        let (mut injector, backend) = make_injector(MockCapabilityBackend::new());

        // Act
        injector.swipe(&swipe_args(0, 0, 50, 60, 0)).await.unwrap();

        // Assert
        let events = backend.pointer_events();
        assert_eq!(events.len(), 2);
        assert_eq!((events[0].x(), events[0].y()), (0.0, 0.0));
        assert_eq!(events[1].action, MotionAction::Up);
        assert_eq!((events[1].x(), events[1].y()), (50.0, 60.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_160ms_swipe_has_nine_paced_moves() {
        // Arrange
        let (mut injector, backend) = make_injector(MockCapabilityBackend::new());
        let started = Instant::now();

        // Act
        injector.swipe(&swipe_args(0, 0, 100, 200, 160)).await.unwrap();

        // Assert
        let events = backend.pointer_events();
        assert_eq!(events.len(), 11);
        assert_eq!(events[0].action, MotionAction::Down);
        assert_eq!(events[10].action, MotionAction::Up);

        let moves = &events[1..10];
        assert!(moves.iter().all(|e| e.action == MotionAction::Move));
        assert!(moves.windows(2).all(|w| w[0].event_time < w[1].event_time));
        assert!(events.iter().all(|e| e.down_time == events[0].down_time));
        assert_eq!(moves[0].event_time, events[0].down_time + 16);
        assert_eq!((moves[4].x(), moves[4].y()), (50.0, 100.0));

        // Nine sleeps of 16 ms each.
        assert_eq!(started.elapsed(), Duration::from_millis(144));
    }

    #[tokio::test(start_paused = true)]
    async fn test_swipe_aborts_on_first_failure() {
        // Arrange – DOWN and two MOVEs succeed, the third MOVE fails
        let (mut injector, backend) = make_injector(MockCapabilityBackend::new().with_fail_after(3));

        // Act
        let result = injector.swipe(&swipe_args(0, 0, 100, 0, 160)).await;

        // Assert – nothing after the failure, no UP
        assert!(matches!(result, Err(GestureError::Injection(_))));
        let events = backend.pointer_events();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.action != MotionAction::Up));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_swipe_down_injects_nothing_else() {
        let (mut injector, backend) = make_injector(MockCapabilityBackend::new().with_fail_after(0));

        let result = injector.swipe(&swipe_args(0, 0, 100, 0, 160)).await;

        assert!(result.is_err());
        assert_eq!(backend.injection_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_swipe_between_steps() {
        // Arrange
        let backend = Arc::new(MockCapabilityBackend::new());
        let cancel = CancellationToken::new();
        let mut injector = InputInjector::new(
            Arc::clone(&backend) as Arc<dyn CapabilityBackend>,
            DisplayId::PRIMARY,
            cancel.clone(),
        );
        cancel.cancel();

        // Act
        let result = injector.swipe(&swipe_args(0, 0, 100, 0, 1600)).await;

        // Assert – DOWN and the first MOVE went out, then the pause observed cancellation
        assert!(matches!(result, Err(GestureError::Cancelled)));
        assert_eq!(backend.pointer_events().len(), 2);
    }

    // ── Keycode ───────────────────────────────────────────────────────────────

    #[test]
    fn test_keycode_both_is_one_press_release() {
        let (injector, backend) = make_injector(MockCapabilityBackend::new());
        let args = KeycodeArgs { code: KeyCode::MENU, action: KeycodeAction::Both };

        injector.keycode(&args).unwrap();

        assert_eq!(backend.press_releases(), vec![KeyCode::MENU]);
        assert!(backend.key_events().is_empty());
    }

    #[test]
    fn test_keycode_down_and_up_are_single_events() {
        // Arrange
        let (injector, backend) = make_injector(MockCapabilityBackend::new());

        // Act
        injector
            .keycode(&KeycodeArgs { code: KeyCode::ENTER, action: KeycodeAction::Down })
            .unwrap();
        injector
            .keycode(&KeycodeArgs { code: KeyCode::ENTER, action: KeycodeAction::Up })
            .unwrap();

        // Assert
        assert_eq!(
            backend.key_events(),
            vec![KeyEvent::down(KeyCode::ENTER), KeyEvent::up(KeyCode::ENTER)]
        );
    }

    #[test]
    fn test_unrecognised_key_action_injects_nothing() {
        let (injector, backend) = make_injector(MockCapabilityBackend::new());
        let args = KeycodeArgs {
            code: KeyCode::ENTER,
            action: KeycodeAction::Unrecognized("hold".into()),
        };

        let result = injector.keycode(&args);

        assert!(matches!(result, Err(GestureError::UnknownKeyAction(ref w)) if w == "hold"));
        assert!(backend.key_events().is_empty());
        assert!(backend.press_releases().is_empty());
    }
}
