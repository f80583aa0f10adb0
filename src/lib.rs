//! Perception Schema Registry
//!
//! Versioned, append-only taxonomy of the perception format: measurement
//! states, movement and object classifications, perception types, sensor
//! modalities and tracking points, each a closed family of stable integer
//! codes, plus one format version for the whole set.
//!
//! ## Features
//!
//! - **Immutable Tables**: Families are compile-time data, safe to read from any thread
//! - **Stable Codes**: Values travel as integer codes; unknown codes decode to the family sentinel
//! - **Format Versioning**: One `v<major>.<minor>` tag decides payload compatibility
//! - **Checksum Validation**: SHA256 checksums pin a published snapshot
//! - **Compatibility Checking**: Detects removed, reassigned or renamed codes between snapshots
//! - **Code Generation**: Emits the C++ header consumed by downstream components
//!
//! ## Families
//!
//! ```text
//! MeasState               UNKNOWN=0 ... NEW_FROM_MERGE=6
//! MovementClassification  NO_INFO=0 ... STOPPED=7
//! ObjectClassification    NO_INFO=0 ... UNKNOWN=15
//! PerceptionType          NOT_PROVIDED=0 ... DETERMINED=2
//! SensorModality          LIDAR=1 ... FUSION=6        (no sentinel)
//! TrackingPoint           UNKNOWN=0 ... REAR_RIGHT_CORNER=9
//! ```

pub mod types;
pub mod registry;
pub mod version;
pub mod manifest;
pub mod compatibility;
pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;

pub use registry::{
    current_format_version, lookup_by_code, lookup_by_name, Family, FamilyTable, SchemaRegistry,
    REGISTRY,
};
pub use types::{
    decode_wire, ClassificationTrack, CodedEnum, Dimensions, MeasState, MovementClassification,
    ObjectClassification, PerceptionType, SensorModality, TrackingPoint,
};
pub use version::{check_payload_version, FormatVersion, VersionPolicy, FORMAT_VERSION};
pub use manifest::{FamilyManifest, MemberEntry, SchemaManifest};
pub use compatibility::{ChangeType, CompatibilityChecker, CompatibilityResult, SchemaChange};
pub use checksum::Checksum;
pub use config::{OutputFormat, SchemaConfig, UnknownCodePolicy};
pub use error::{SchemaError, Result};
