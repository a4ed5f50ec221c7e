//! Lorbital Render Engine
//!
//! Decouples input rate from render rate. Input adapters write *target*
//! orientation and scale; the per-frame tick is the only writer of the
//! *current* values, which chase the targets by a fixed interpolation factor.
//!
//! ```text
//! mouse / touch / wheel ──┐
//!                         ├── target orientation, target scale
//! gesture controller ─────┘            │
//!                                      ▼  tick(): slerp / lerp
//!                         current orientation, current scale
//!                                      │
//!                                      ▼
//!                               FrameTransform ──▶ scene
//! ```

pub mod controller;
pub mod input;

pub use controller::{FrameTransform, RenderConfig, RenderController, RenderState, RotationOrigin};
pub use input::{PointerConfig, PointerInput};
