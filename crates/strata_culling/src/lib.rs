//! # STRATA Culling
//!
//! Decides which loaded chunks are worth meshing and drawing.
//!
//! ## Pipeline
//!
//! 1. `Aabb::of_chunk`: world-space box around a chunk's occupied cells
//! 2. `Frustum::from_view_projection`: six normalized planes from the camera
//! 3. `is_visible`: a box is hidden only if all 8 corners are outside one plane
//!
//! The test is conservative: it never hides a visible chunk, but may keep a
//! hidden one near a frustum edge. That is the right trade for culling.
//!
//! ## Example
//!
//! ```rust
//! use strata_culling::{camera, FrustumCuller};
//! use strata_world::{BlockPos, BlockType, World, WorldSeed};
//!
//! let mut world = World::with_seed(WorldSeed::new(42));
//! world.add_block(BlockPos::new(0, 10, -20), BlockType::Stone);
//!
//! let view_proj = camera::view_projection(
//!     [0.0, 10.0, 0.0],
//!     [0.0, 10.0, -1.0],
//!     1.2,
//!     16.0 / 9.0,
//!     0.1,
//!     500.0,
//! );
//! let mut culler = FrustumCuller::new();
//! culler.update(&view_proj);
//! assert_eq!(culler.visible_chunks(&world).len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aabb;
pub mod camera;
pub mod culler;
pub mod frustum;

pub use aabb::Aabb;
pub use culler::{CullStats, FrustumCuller};
pub use frustum::{is_visible, Frustum, Plane};
