#![forbid(unsafe_code)]

//! Domain types: the identity record, remote items, and the department tree.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// One of the three required identity fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityField {
    Name,
    Phone,
    Email,
}

impl IdentityField {
    pub const ALL: [IdentityField; 3] = [Self::Name, Self::Phone, Self::Email];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Phone => "Phone number",
            Self::Email => "Email",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Phone => 1,
            Self::Email => 2,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Name => Self::Phone,
            Self::Phone => Self::Email,
            Self::Email => Self::Name,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Phone => Self::Name,
            Self::Email => Self::Phone,
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    EmptyField(IdentityField),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::EmptyField(field) => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Name, phone, and email of the person using the client.
///
/// Every field is non-empty; [`IdentityRecord::new`] and deserialization
/// both reject a partial record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IdentityWire")]
pub struct IdentityRecord {
    name: String,
    phone: String,
    email: String,
}

#[derive(Deserialize)]
struct IdentityWire {
    name: String,
    phone: String,
    email: String,
}

impl TryFrom<IdentityWire> for IdentityRecord {
    type Error = IdentityError;

    fn try_from(wire: IdentityWire) -> Result<Self, Self::Error> {
        IdentityRecord::new(wire.name, wire.phone, wire.email)
    }
}

impl IdentityRecord {
    /// # Errors
    ///
    /// Returns the first empty field in form order.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let record = Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        };
        match record.missing_fields().first() {
            Some(field) => Err(IdentityError::EmptyField(*field)),
            None => Ok(record),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn field(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::Name => &self.name,
            IdentityField::Phone => &self.phone,
            IdentityField::Email => &self.email,
        }
    }

    fn missing_fields(&self) -> Vec<IdentityField> {
        IdentityField::ALL
            .into_iter()
            .filter(|f| self.field(*f).is_empty())
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Remote items
// ─────────────────────────────────────────────────────────────────────────────

/// One record from the remote item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub owner_id: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Department tree
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepartmentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubDepartmentId(pub u32);

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "department {}", self.0)
    }
}

impl fmt::Display for SubDepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-department {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDepartmentNode {
    pub id: SubDepartmentId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentNode {
    pub id: DepartmentId,
    pub name: String,
    pub children: Vec<SubDepartmentNode>,
}

impl DepartmentNode {
    pub fn new(id: u32, name: impl Into<String>, children: &[(u32, &str)]) -> Self {
        Self {
            id: DepartmentId(id),
            name: name.into(),
            children: children
                .iter()
                .map(|(id, name)| SubDepartmentNode {
                    id: SubDepartmentId(*id),
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    DuplicateDepartment(DepartmentId),
    DuplicateSubDepartment(SubDepartmentId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::DuplicateDepartment(id) => write!(f, "duplicate {id}"),
            TreeError::DuplicateSubDepartment(id) => write!(f, "duplicate {id}"),
        }
    }
}

impl std::error::Error for TreeError {}

/// Ordered departments whose ids are unique within each keyspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentTree {
    departments: Vec<DepartmentNode>,
}

impl DepartmentTree {
    /// # Errors
    ///
    /// Rejects a repeated department id or a sub-department id that appears
    /// twice anywhere in the tree.
    pub fn new(departments: Vec<DepartmentNode>) -> Result<Self, TreeError> {
        let mut seen_departments = HashSet::new();
        let mut seen_subs = HashSet::new();
        for dept in &departments {
            if !seen_departments.insert(dept.id) {
                return Err(TreeError::DuplicateDepartment(dept.id));
            }
            for sub in &dept.children {
                if !seen_subs.insert(sub.id) {
                    return Err(TreeError::DuplicateSubDepartment(sub.id));
                }
            }
        }
        Ok(Self { departments })
    }

    /// The fixed organisation shown on the detail screen.
    pub fn standard() -> Self {
        Self {
            departments: vec![
                DepartmentNode::new(
                    1,
                    "Human Resources",
                    &[(1, "Recruitment"), (2, "Employee Relations")],
                ),
                DepartmentNode::new(2, "IT Department", &[(3, "Infrastructure"), (4, "Development")]),
            ],
        }
    }

    pub fn departments(&self) -> &[DepartmentNode] {
        &self.departments
    }

    pub fn department(&self, id: DepartmentId) -> Option<&DepartmentNode> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn sub_department(&self, id: SubDepartmentId) -> Option<&SubDepartmentNode> {
        self.departments
            .iter()
            .flat_map(|d| d.children.iter())
            .find(|s| s.id == id)
    }
}
