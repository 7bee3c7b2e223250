//! JVM argument handling for the load-tool launcher.
//!
//! ```text
//! Config → Compute → Inject testRunId → Encode (classify, redact, merge) → ConfigMap
//! ```
//!
//! Each stage is a pure function that can be unit-tested independently.

mod assembler;
mod classifier;
mod encoder;
mod propagation;
mod redaction;
mod registry;

pub use assembler::{
    compute_jvm_args, inject_test_run_id, TestRunIdChange, ToolArgs, ToolVersion,
    DEFAULT_JVM_OPTIONS, DISABLE_CLASSPATH_URL_CHECK,
};
pub use classifier::{classify, ClassifiedFlag};
pub use encoder::{
    encode, encode_outcome, ConfigMap, EncodeOptions, EncodeOutcome, MERGE_SEPARATOR,
    NAMESPACE_PREFIX,
};
pub use propagation::{escape_property_value, is_propagatable, propagated_flags, Propagation};
pub use redaction::{Denylist, DEFAULT_REDACTED_NAMES};
pub use registry::{flag_rules, Extracted, FlagFamily, FlagRule, SIZED_X_FLAGS};
