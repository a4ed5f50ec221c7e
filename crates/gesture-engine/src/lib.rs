//! Lorbital Gesture Engine
//!
//! Turns noisy, irregular hand-landmark frames into stable manipulation
//! commands:
//! - **Classifier:** landmarks → none / one-hand pinch / two-hand pinch
//! - **Controller:** debounced gesture state machine driving a [`ManipulationTarget`]
//! - **Smoother:** dead-zone, time-normalized, speed-adaptive rotation deltas
//! - **Tutorial:** a lightweight single-hand session for the onboarding demo
//!
//! This crate is pure computation: no I/O, no clocks, no threads. Time is
//! always an explicit argument.

pub mod classifier;
pub mod controller;
pub mod smoother;
pub mod tutorial;

pub use classifier::{ClassifierConfig, GestureClassifier};
pub use controller::{ControllerSnapshot, GestureConfig, GestureController, ManipulationTarget};
pub use smoother::{MotionSmoother, SmootherConfig};
pub use tutorial::TutorialDemo;
