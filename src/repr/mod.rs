use crate::{edge::*, error::*, node::*, ops::*};

mod attributes;
mod graph;
mod weights;

pub use attributes::*;
pub use graph::*;
pub use weights::*;
