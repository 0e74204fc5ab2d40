//! Scene graph for the orrery.
//!
//! [`SceneBuilder`] turns a catalog into a [`SceneGraph`]: the star with its
//! corona, one node per orbiting body (marker, optional ring, orbit guide, pick
//! metadata), a starfield and lights. The graph answers pick queries and
//! flattens itself into a [`DrawList`] for any [`SceneRenderer`].

mod builder;
mod draw;
mod error;
mod graph;
pub mod mesh;
mod picking;
mod starfield;

pub use builder::{MIN_ORBIT_SEGMENTS, SceneBuilder, SceneSettings};
pub use draw::{
    DrawList, GuideInstance, MeshInstance, MeshKind, PointsInstance, SceneRenderer, Shading,
};
pub use error::{RenderError, SceneError};
pub use graph::{
    BodyKey, BodyNode, CoronaNode, DirectionalLight, Lighting, Marker, OrbitGuide, PickMeta,
    PointLight, RingNode, SceneGraph, StarNode,
};
pub use picking::PickHit;
pub use starfield::{
    AsteroidBelt, AsteroidField, StarPoint, Starfield, StarfieldGenerator, hsl_to_linear,
};
