//! The static table of resource collections.

use crate::permission::Permission;

use super::spec::{EnumField, Filter, Reference, ResourceAccess, ResourceSpec, SortOrder};

const ACTIVE: &[&str] = &["Active", "Inactive"];
const PUBLISH: &[&str] = &["Draft", "Published"];
const LEAD: &[&str] = &["New", "Contacted", "Converted"];
const APPOINTMENT: &[&str] = &["Pending", "Confirmed", "Completed", "Cancelled"];

const ACTIVE_STATUS: &[EnumField] = &[EnumField {
    field: "status",
    values: ACTIVE,
}];
const LEAD_STATUS: &[EnumField] = &[EnumField {
    field: "status",
    values: LEAD,
}];

const BY_STATUS: Filter = Filter::Exact {
    param: "status",
    field: "status",
};
const BY_CATEGORY: Filter = Filter::Exact {
    param: "category",
    field: "category",
};
const BY_COUNTRY: Filter = Filter::Exact {
    param: "country",
    field: "country",
};

/// Shape shared by every content collection; callers override what differs.
const fn content(
    name: &'static str,
    label: &'static str,
    permission: Permission,
    required: &'static [&'static str],
) -> ResourceSpec {
    ResourceSpec {
        name,
        label,
        permission,
        required,
        unique: &[],
        enums: ACTIVE_STATUS,
        emails: &[],
        timestamps: &[],
        filters: &[BY_STATUS],
        search: &[],
        default_filter: None,
        sort: SortOrder::OldestFirst,
        access: ResourceAccess::content(permission),
        referenced_by: &[],
    }
}

const fn lead(
    name: &'static str,
    label: &'static str,
    permission: Permission,
    required: &'static [&'static str],
) -> ResourceSpec {
    ResourceSpec {
        name,
        label,
        permission,
        required,
        unique: &[],
        enums: LEAD_STATUS,
        emails: &["email"],
        timestamps: &["date"],
        filters: &[BY_STATUS],
        search: &["name", "email"],
        default_filter: None,
        sort: SortOrder::NewestFirst,
        access: ResourceAccess::lead(permission),
        referenced_by: &[],
    }
}

pub static BLOGS: ResourceSpec = ResourceSpec {
    unique: &["slug"],
    enums: &[EnumField {
        field: "status",
        values: PUBLISH,
    }],
    filters: &[
        Filter::Tag {
            param: "tag",
            field: "tags",
        },
        BY_CATEGORY,
        BY_STATUS,
    ],
    search: &["title", "excerpt"],
    default_filter: Some(("status", "Published")),
    sort: SortOrder::NewestFirst,
    ..content(
        "blogs",
        "Blog",
        Permission::Blogs,
        &["title", "slug", "excerpt", "content", "author"],
    )
};

pub static BRANCHES: ResourceSpec = ResourceSpec {
    unique: &["name"],
    ..content(
        "branches",
        "Branch",
        Permission::Branches,
        &["name", "address", "phone"],
    )
};

pub static CLASSES: ResourceSpec = ResourceSpec {
    filters: &[BY_STATUS, BY_CATEGORY],
    ..content("classes", "Class", Permission::Classes, &["title"])
};

pub static INSTITUTE_CLASSES: ResourceSpec = ResourceSpec {
    filters: &[BY_STATUS, BY_CATEGORY],
    ..content(
        "institute-classes",
        "Institute class",
        Permission::Classes,
        &["title"],
    )
};

pub static PROGRAMS: ResourceSpec = ResourceSpec {
    filters: &[
        BY_STATUS,
        BY_COUNTRY,
        Filter::Exact {
            param: "university",
            field: "university",
        },
        Filter::Exact {
            param: "level",
            field: "level",
        },
    ],
    search: &["title", "university"],
    ..content(
        "programs",
        "Program",
        Permission::Programs,
        &["title", "university"],
    )
};

pub static UNIVERSITIES: ResourceSpec = ResourceSpec {
    unique: &["name"],
    filters: &[BY_STATUS, BY_COUNTRY],
    search: &["name", "country"],
    sort: SortOrder::Alphabetical("name"),
    referenced_by: &[Reference {
        collection: "programs",
        field: "university",
        key: "name",
        noun: "program",
    }],
    ..content(
        "universities",
        "University",
        Permission::Universities,
        &["name", "country"],
    )
};

pub static OFFERS: ResourceSpec = content("offers", "Offer", Permission::Offers, &["title"]);

pub static HERO: ResourceSpec = content("hero", "Hero", Permission::Settings, &["title"]);

pub static GALLERY: ResourceSpec = ResourceSpec {
    filters: &[BY_STATUS, BY_CATEGORY],
    ..content("gallery", "Gallery event", Permission::Gallery, &["title"])
};

pub static APPOINTMENTS: ResourceSpec = ResourceSpec {
    enums: &[EnumField {
        field: "status",
        values: APPOINTMENT,
    }],
    timestamps: &[],
    ..lead(
        "appointments",
        "Appointment",
        Permission::Applications,
        &["name", "email", "phone", "date"],
    )
};

pub static CLASS_INQUIRIES: ResourceSpec = lead(
    "class-inquiries",
    "Class inquiry",
    Permission::Leads,
    &["name", "email", "phone"],
);

pub static PROGRAM_INQUIRIES: ResourceSpec = lead(
    "program-inquiries",
    "Program inquiry",
    Permission::Leads,
    &["name", "email", "phone"],
);

pub static CONTACTS: ResourceSpec = lead(
    "contacts",
    "Contact",
    Permission::Contacts,
    &["name", "email", "message"],
);

/// Every collection, in route registration order.
pub static ALL: [&ResourceSpec; 13] = [
    &BLOGS,
    &BRANCHES,
    &CLASSES,
    &INSTITUTE_CLASSES,
    &PROGRAMS,
    &UNIVERSITIES,
    &OFFERS,
    &HERO,
    &GALLERY,
    &APPOINTMENTS,
    &CLASS_INQUIRIES,
    &PROGRAM_INQUIRIES,
    &CONTACTS,
];

pub fn find(name: &str) -> Option<&'static ResourceSpec> {
    ALL.iter().copied().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Access;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = ALL.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_every_enum_has_a_default() {
        for spec in ALL {
            for e in spec.enums {
                assert!(!e.default_value().is_empty(), "{} has an empty enum", spec.name);
            }
        }
    }

    #[test]
    fn test_content_reads_are_public() {
        for spec in [&BLOGS, &CLASSES, &UNIVERSITIES, &HERO] {
            assert!(spec.access.list.is_public());
            assert!(spec.access.get.is_public());
            assert!(!spec.access.create.is_public());
        }
    }

    #[test]
    fn test_lead_submission_is_public_and_reads_are_gated() {
        for spec in [&APPOINTMENTS, &CLASS_INQUIRIES, &PROGRAM_INQUIRIES, &CONTACTS] {
            assert!(spec.access.create.is_public());
            assert_eq!(spec.access.list, Access::staff(spec.permission));
            assert_eq!(spec.access.delete, Access::staff(spec.permission));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(find("institute-classes").map(|s| s.label), Some("Institute class"));
        assert!(find("payments").is_none());
    }

    #[test]
    fn test_permission_mapping() {
        assert_eq!(HERO.permission, Permission::Settings);
        assert_eq!(APPOINTMENTS.permission, Permission::Applications);
        assert_eq!(CLASS_INQUIRIES.permission, Permission::Leads);
        assert_eq!(INSTITUTE_CLASSES.permission, Permission::Classes);
    }
}
