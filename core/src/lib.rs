//! # Studio Core
//!
//! The small set of abstractions the booking wizard is built on.
//!
//! ## Core Concepts
//!
//! - **State**: Everything a wizard session remembers between user actions
//! - **Action**: Every input to a reducer (user commands and results fed back by effects)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: A description of side-effecting work (notifications, text generation)
//! - **Environment**: Injected collaborators (clock, ledger, producers, dispatchers)
//!
//! Reducers never perform I/O. They return effects, and the runtime in
//! `studio-runtime` executes them and feeds any resulting action back in.
//!
//! ## Example
//!
//! ```
//! use studio_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Default)]
//! struct SeatsState {
//!     taken: u32,
//! }
//!
//! enum SeatsAction {
//!     Take,
//! }
//!
//! struct SeatsReducer;
//!
//! impl Reducer for SeatsReducer {
//!     type State = SeatsState;
//!     type Action = SeatsAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SeatsState,
//!         action: SeatsAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<SeatsAction>; 4]> {
//!         match action {
//!             SeatsAction::Take => state.taken += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = SeatsState::default();
//! let effects = SeatsReducer.reduce(&mut state, SeatsAction::Take, &());
//! assert_eq!(state.taken, 1);
//! assert!(effects.is_empty());
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - where the business logic lives
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// A reducer validates an action against the current state, mutates the
    /// state in place, and describes any follow-up work as effects. It must
    /// not block, sleep, or perform I/O: anything slow goes into an
    /// [`Effect::Future`].
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime (usually zero or one)
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values. Returning one from a reducer does nothing by itself;
/// the runtime decides when and how to run it.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future carried by [`Effect::Future`]
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, the action is fed back
        /// into the reducer.
        Future(EffectFuture<Action>),
    }

    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block as an effect
        ///
        /// ```
        /// use studio_core::effect::Effect;
        ///
        /// let effect: Effect<u8> = Effect::future(async { Some(7) });
        /// assert!(effect.is_future());
        /// ```
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: std::future::Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Whether this effect is an async computation
        #[must_use]
        pub const fn is_future(&self) -> bool {
            matches!(self, Effect::Future(_))
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time so "today" and "now" are testable
    ///
    /// The availability engine hides past slots, which makes every slot
    /// computation depend on the current moment. Production injects
    /// [`SystemClock`]; tests inject a fixed clock.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};

    #[test]
    fn debug_output_hides_future_body() {
        let effect: Effect<u8> = Effect::future(async { None });
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn none_is_not_a_future() {
        let effect: Effect<u8> = Effect::None;
        assert!(effect.is_none());
        assert!(!effect.is_future());
        assert_eq!(format!("{effect:?}"), "Effect::None");
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn future_effect_resolves_to_action() {
        let effect: Effect<u8> = Effect::future(async { Some(3) });
        let Effect::Future(fut) = effect else {
            unreachable!("constructed as a future");
        };
        assert_eq!(tokio_test::block_on(fut).unwrap(), 3);
    }

    #[test]
    fn system_clock_moves_forward() {
        let first = SystemClock.now();
        let second = SystemClock.now();
        assert!(second >= first);
    }
}
