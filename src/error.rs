//! Error types for rule and shape configuration.

use thiserror::Error;

use crate::team::Team;

/// Fatal configuration error. The rule table or shape that produced it must not be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown collision team \"{name}\"")]
    UnknownTeam { name: String },

    #[error("unknown collision type \"{name}\"")]
    UnknownCollisionType { name: String },

    /// A collide rule and a contain rule express opposite relations for the same teams.
    #[error("rule ({first}, {second}) contradicts an existing inverse rule")]
    InverseRule { first: Team, second: Team },

    #[error("cannot register \"{name}\": every id is already taken")]
    TooManyNames { name: String },

    #[error("team {team} cannot contain itself")]
    SelfContainment { team: Team },

    #[error("invalid hit box {hitbox} in frame {frame}: {source}")]
    Shape {
        frame: usize,
        hitbox: usize,
        #[source]
        source: ShapeError,
    },
}

/// Geometry invariant violation, detected once when a hit box is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("a polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("polygon is not convex")]
    NonConvex,

    #[error("polygon points are not in clockwise order")]
    WrongWinding,

    #[error("polygon has a zero-length edge at point {0}")]
    DegenerateEdge(usize),

    #[error("width and height must be positive")]
    InvalidDimensions,

    #[error("polygon contains a non-finite coordinate")]
    NonFinite,
}
