mod device_check;
mod report;
mod stats;
mod timers;

pub use device_check::{validate_op_tensor_devices, DeviceMismatch};
pub use report::OpStat;
pub use stats::TimingStat;
pub use timers::{OpTimers, TypeTimers};

pub(crate) use report::{print_summary, stat_record};
