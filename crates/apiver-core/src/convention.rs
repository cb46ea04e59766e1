//! Convention-based version declarations
//!
//! Integrators declare, per endpoint group, which versions it implements and
//! advertises, and optionally narrow individual members. [`ConventionBuilder::build`]
//! validates the declarations and freezes them into a [`VersionTable`].
//!
//! # Example
//!
//! ```
//! use apiver_core::{ApiVersion, ConventionBuilder};
//!
//! let mut conventions = ConventionBuilder::new();
//! conventions.group("OrdersController").declare_version(ApiVersion::new(1, 0));
//! conventions
//!     .group("PeopleController")
//!     .declare_version(ApiVersion::new(1, 0))
//!     .declare_version(ApiVersion::new(2, 0))
//!     .member("Patch")
//!     .map_to_version(ApiVersion::new(2, 0));
//!
//! let table = conventions.build().unwrap();
//! let patch = table.model("PeopleController", "Patch").unwrap();
//! assert!(!patch.is_mapped_to(&ApiVersion::new(1, 0)));
//! ```

use crate::error::{Result, VersioningError};
use crate::model::{ApiVersionModel, VersionedEndpoint};
use crate::naming::GroupNameConvention;
use crate::options::VersioningOptions;
use crate::range::VersionRange;
use crate::version::ApiVersion;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Mutable collection of group conventions
#[derive(Debug, Clone, Default)]
pub struct ConventionBuilder {
    naming: GroupNameConvention,
    groups: BTreeMap<String, GroupConvention>,
}

impl ConventionBuilder {
    /// Create an empty builder using the default naming convention
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder using the naming convention of `options`
    pub fn with_options(options: &VersioningOptions) -> Self {
        Self::new().naming(options.group_name_convention)
    }

    /// Set the convention deriving logical names from declared group names
    pub fn naming(mut self, naming: GroupNameConvention) -> Self {
        self.naming = naming;
        self
    }

    /// Get or create the convention for a group
    pub fn group(&mut self, name: impl Into<String>) -> &mut GroupConvention {
        self.groups.entry(name.into()).or_default()
    }

    /// Validate every declaration and freeze the result
    ///
    /// # Errors
    ///
    /// [`VersioningError::InvalidConvention`] when a group that is not
    /// version-neutral declares no version, or when a member is mapped to a
    /// version its group does not declare.
    pub fn build(self) -> Result<VersionTable> {
        let mut groups = BTreeMap::new();
        let mut unreachable = Vec::new();

        for (key, group) in self.groups {
            let name = self.naming.logical_name(&key).to_string();
            let models = group.freeze(&key, name, &mut unreachable)?;
            groups.insert(key, models);
        }

        tracing::debug!(
            groups = groups.len(),
            unreachable = unreachable.len(),
            "API version conventions frozen"
        );

        Ok(VersionTable {
            groups,
            unreachable,
        })
    }
}

/// Version declarations for one endpoint group
#[derive(Debug, Clone, Default)]
pub struct GroupConvention {
    declared: BTreeSet<ApiVersion>,
    declared_deprecated: BTreeSet<ApiVersion>,
    advertised: BTreeSet<ApiVersion>,
    advertised_deprecated: BTreeSet<ApiVersion>,
    version_neutral: bool,
    members: BTreeMap<String, MemberConvention>,
}

impl GroupConvention {
    /// The group implements `version`
    pub fn declare_version(&mut self, version: ApiVersion) -> &mut Self {
        self.declared.insert(version);
        self
    }

    /// The group implements `version`, which is deprecated
    pub fn declare_deprecated_version(&mut self, version: ApiVersion) -> &mut Self {
        self.declared_deprecated.insert(version);
        self
    }

    /// The API offers `version` elsewhere; reported, never matched here
    pub fn advertise_version(&mut self, version: ApiVersion) -> &mut Self {
        self.advertised.insert(version);
        self
    }

    /// The API offers deprecated `version` elsewhere
    pub fn advertise_deprecated_version(&mut self, version: ApiVersion) -> &mut Self {
        self.advertised_deprecated.insert(version);
        self
    }

    /// Every member of the group ignores versioning
    pub fn version_neutral(&mut self) -> &mut Self {
        self.version_neutral = true;
        self
    }

    /// Get or create the convention for a member of the group
    pub fn member(&mut self, name: impl Into<String>) -> &mut MemberConvention {
        self.members.entry(name.into()).or_default()
    }

    fn freeze(
        self,
        key: &str,
        name: String,
        unreachable: &mut Vec<UnreachableMember>,
    ) -> Result<GroupModels> {
        if self.version_neutral {
            if let Some((member, _)) = self.members.iter().find(|(_, m)| !m.mapped.is_empty()) {
                return Err(VersioningError::invalid_convention(
                    key,
                    format!("member '{}' is mapped to versions of a version-neutral group", member),
                ));
            }
            let model = Arc::new(ApiVersionModel::neutral(name));
            return Ok(GroupModels {
                group: model.clone(),
                members: self
                    .members
                    .into_keys()
                    .map(|member| (member, model.clone()))
                    .collect(),
            });
        }

        let declared: BTreeSet<_> = self
            .declared
            .union(&self.declared_deprecated)
            .cloned()
            .collect();
        if declared.is_empty() {
            return Err(VersioningError::invalid_convention(
                key,
                "no API version declared and the group is not version-neutral",
            ));
        }

        let deprecated: BTreeSet<_> = self
            .declared_deprecated
            .union(&self.advertised_deprecated)
            .cloned()
            .collect();
        let supported: BTreeSet<_> = declared
            .iter()
            .chain(&self.advertised)
            .chain(&deprecated)
            .cloned()
            .collect();

        let group = ApiVersionModel {
            name: name.clone(),
            mapped: declared.clone(),
            declared: declared.clone(),
            supported,
            deprecated,
            version_neutral: false,
        };

        let mut members = BTreeMap::new();
        for (member_name, member) in self.members {
            let model = if member.version_neutral {
                ApiVersionModel::neutral(name.clone())
            } else {
                let mapped = member.resolve(key, &member_name, &declared)?;
                if mapped.is_empty() {
                    tracing::warn!(
                        group = %key,
                        member = %member_name,
                        "member is not mapped to any API version and can never be reached"
                    );
                    unreachable.push(UnreachableMember {
                        group: key.to_string(),
                        member: member_name.clone(),
                    });
                }
                ApiVersionModel {
                    mapped,
                    ..group.clone()
                }
            };
            members.insert(member_name, Arc::new(model));
        }

        Ok(GroupModels {
            group: Arc::new(group),
            members,
        })
    }
}

/// Version declarations for one member of a group
#[derive(Debug, Clone, Default)]
pub struct MemberConvention {
    mapped: BTreeSet<ApiVersion>,
    range: Option<VersionRange>,
    version_neutral: bool,
}

impl MemberConvention {
    /// Answer `version` only, among the group's declared versions
    pub fn map_to_version(&mut self, version: ApiVersion) -> &mut Self {
        self.mapped.insert(version);
        self
    }

    /// Keep only versions within `range`, e.g. `VersionRange::from(2.0)` for
    /// a member introduced in 2.0
    pub fn within(&mut self, range: VersionRange) -> &mut Self {
        self.range = Some(range);
        self
    }

    /// The member ignores versioning
    pub fn version_neutral(&mut self) -> &mut Self {
        self.version_neutral = true;
        self
    }

    fn resolve(
        self,
        group: &str,
        member: &str,
        declared: &BTreeSet<ApiVersion>,
    ) -> Result<BTreeSet<ApiVersion>> {
        let undeclared: Vec<String> = self
            .mapped
            .difference(declared)
            .map(ToString::to_string)
            .collect();
        if !undeclared.is_empty() {
            return Err(VersioningError::invalid_convention(
                group,
                format!(
                    "member '{}' is mapped to {} which the group does not declare",
                    member,
                    undeclared.join(", ")
                ),
            ));
        }

        let mut mapped = if self.mapped.is_empty() {
            declared.clone()
        } else {
            self.mapped
        };
        if let Some(range) = &self.range {
            mapped.retain(|version| range.contains(version));
        }
        Ok(mapped)
    }
}

/// A member left without any version after narrowing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreachableMember {
    /// Declared group name
    pub group: String,
    /// Member name
    pub member: String,
}

#[derive(Debug, Clone)]
struct GroupModels {
    group: Arc<ApiVersionModel>,
    members: BTreeMap<String, Arc<ApiVersionModel>>,
}

/// Frozen version models, keyed by declared group and member names
///
/// Immutable; share it behind an [`Arc`] across request threads.
#[derive(Debug, Clone, Default)]
pub struct VersionTable {
    groups: BTreeMap<String, GroupModels>,
    unreachable: Vec<UnreachableMember>,
}

impl VersionTable {
    /// Model of a group itself (its implicit member model)
    pub fn group_model(&self, group: &str) -> Option<&Arc<ApiVersionModel>> {
        self.groups.get(group).map(|models| &models.group)
    }

    /// Model of a member; members without a convention inherit the group's
    pub fn model(&self, group: &str, member: &str) -> Option<Arc<ApiVersionModel>> {
        let models = self.groups.get(group)?;
        Some(
            models
                .members
                .get(member)
                .unwrap_or(&models.group)
                .clone(),
        )
    }

    /// Build a candidate endpoint identified as `group.member`
    pub fn endpoint(&self, group: &str, member: &str) -> Option<VersionedEndpoint> {
        self.model(group, member)
            .map(|model| VersionedEndpoint::new(format!("{}.{}", group, member), model))
    }

    /// Declared group names, in order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Members that no version can reach
    pub fn unreachable_members(&self) -> &[UnreachableMember] {
        &self.unreachable
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group was declared
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One-time initialization gate around a [`ConventionBuilder`]
///
/// Configuration may be added until the first call to [`get`](Self::get).
/// That call builds the table exactly once; every caller, on any thread,
/// observes the same table or the same error. Later configuration fails with
/// [`VersioningError::FrozenModel`].
#[derive(Debug, Default)]
pub struct ConventionCell {
    pending: Mutex<Option<ConventionBuilder>>,
    frozen: OnceLock<Result<Arc<VersionTable>>>,
}

impl ConventionCell {
    /// Create a gate seeded with a builder
    pub fn new(builder: ConventionBuilder) -> Self {
        Self {
            pending: Mutex::new(Some(builder)),
            frozen: OnceLock::new(),
        }
    }

    /// Add declarations before the table is frozen
    pub fn configure<F>(&self, configure: F) -> Result<()>
    where
        F: FnOnce(&mut ConventionBuilder),
    {
        let mut pending = lock(&self.pending);
        if self.frozen.get().is_some() {
            return Err(VersioningError::FrozenModel);
        }
        configure(pending.get_or_insert_with(ConventionBuilder::new));
        Ok(())
    }

    /// Freeze on first use and return the shared table
    pub fn get(&self) -> Result<Arc<VersionTable>> {
        if let Some(frozen) = self.frozen.get() {
            return frozen.clone();
        }
        let mut pending = lock(&self.pending);
        self.frozen
            .get_or_init(|| {
                pending
                    .take()
                    .unwrap_or_default()
                    .build()
                    .map(Arc::new)
            })
            .clone()
    }

    /// Whether the table has been built
    pub fn is_frozen(&self) -> bool {
        self.frozen.get().is_some()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
