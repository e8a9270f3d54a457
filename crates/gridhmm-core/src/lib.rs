mod model;

pub use model::belief::BeliefState;
pub use model::config::{ConfigError, ModelConfig};
pub use model::error::FilterError;
pub use model::filter::BeliefFilter;
pub use model::grid::TerrainGrid;
pub use model::ids::Position;
pub use model::scenario::Scenario;
pub use model::terrain::{Action, Observation, TerrainKind};
pub use model::trace::BeliefTrace;
