mod clock;
mod id_generator;
mod notifier;
mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use id_generator::IdGenerator;
pub use notifier::IChangeNotifier;
pub use storage::{IHistoricStorage, IProfileStorage, IRatingStorage, WriteOutcome};
