//! One [`ToolBox`](crate::tool::ToolBox) per Assistants API resource family.

mod assistants;
mod messages;
mod run_steps;
mod runs;
mod threads;

pub use assistants::AssistantTools;
pub use messages::MessageTools;
pub use run_steps::RunStepTools;
pub use runs::RunTools;
pub use threads::ThreadTools;

use crate::tool::ToolSet;

/// All 23 Assistants API tools.
pub fn assistants_toolset() -> ToolSet {
    ToolSet::new()
        .with_toolbox(AssistantTools)
        .with_toolbox(ThreadTools)
        .with_toolbox(MessageTools)
        .with_toolbox(RunTools)
        .with_toolbox(RunStepTools)
}
