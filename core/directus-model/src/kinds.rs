//! Built-in Directus resource kinds.

use crate::{AssociationSpec, FieldSpec, ResourceSchema};
use directus_types::IdKind;

pub const ROLE: &str = "role";
pub const POLICY: &str = "policy";
pub const PERMISSION: &str = "permission";
pub const SETTING: &str = "setting";
pub const FILE: &str = "file";

/// Names of every built-in kind, in the order [`all`] returns them.
pub const NAMES: [&str; 5] = [ROLE, POLICY, PERMISSION, SETTING, FILE];

/// Roles, with their attached access policies as an association.
#[must_use]
pub fn role() -> ResourceSchema {
    ResourceSchema {
        type_name: ROLE.into(),
        collection: "roles".into(),
        id_kind: IdKind::Text,
        singleton: false,
        fields: vec![
            FieldSpec::text("name").required(),
            FieldSpec::text("icon"),
            FieldSpec::text("description"),
        ],
        association: Some(AssociationSpec {
            field: "policies".into(),
            owner_key: "role".into(),
            target_key: "policy".into(),
            read_fields: "policies.policy.id".into(),
        }),
        read_fields: Some("*,policies.policy.id".into()),
    }
}

#[must_use]
pub fn policy() -> ResourceSchema {
    ResourceSchema {
        type_name: POLICY.into(),
        collection: "policies".into(),
        id_kind: IdKind::Text,
        singleton: false,
        fields: vec![
            FieldSpec::text("name").required(),
            FieldSpec::text("icon"),
            FieldSpec::text("description"),
            FieldSpec::text_list("ip_access"),
            FieldSpec::boolean("enforce_tfa"),
            FieldSpec::boolean("admin_access"),
            FieldSpec::boolean("app_access"),
        ],
        association: None,
        read_fields: None,
    }
}

/// Permissions are the one kind keyed by auto-increment integers.
#[must_use]
pub fn permission() -> ResourceSchema {
    ResourceSchema {
        type_name: PERMISSION.into(),
        collection: "permissions".into(),
        id_kind: IdKind::Integer,
        singleton: false,
        fields: vec![
            FieldSpec::text("collection"),
            FieldSpec::text("action"),
            FieldSpec::text("policy").required(),
            FieldSpec::raw_json("permissions"),
            FieldSpec::raw_json("validation"),
            FieldSpec::raw_json("presets"),
            FieldSpec::text_list("fields"),
            FieldSpec::boolean("system").read_only(),
        ],
        association: None,
        read_fields: None,
    }
}

/// The project settings singleton.
#[must_use]
pub fn setting() -> ResourceSchema {
    let text = [
        "project_name",
        "project_url",
        "project_color",
        "project_logo",
        "public_foreground",
        "public_background",
        "public_note",
        "auth_password_policy",
        "storage_asset_transform",
        "custom_css",
        "storage_default_folder",
        "mapbox_key",
        "project_descriptor",
        "default_language",
        "public_favicon",
        "default_appearance",
        "default_theme_light",
        "default_theme_dark",
        "report_error_url",
        "report_bug_url",
        "report_feature_url",
        "public_registration_role",
        "public_registration_email_filter",
    ];
    let json = [
        "storage_asset_presets",
        "basemaps",
        "module_bar",
        "custom_aspect_ratios",
        "theme_light_overrides",
        "theme_dark_overrides",
        "visual_editor_urls",
    ];
    let boolean = [
        "public_registration",
        "public_registration_verify_email",
        "accepted_terms",
    ];

    let mut fields: Vec<FieldSpec> = text.into_iter().map(FieldSpec::text).collect();
    fields.push(FieldSpec::integer("auth_login_attempts"));
    fields.extend(json.into_iter().map(FieldSpec::raw_json));
    fields.extend(boolean.into_iter().map(FieldSpec::boolean));
    fields.push(FieldSpec::text("project_id").read_only());

    ResourceSchema {
        type_name: SETTING.into(),
        collection: "settings".into(),
        id_kind: IdKind::Text,
        singleton: true,
        fields,
        association: None,
        read_fields: None,
    }
}

/// File metadata records. Uploading content is out of scope.
#[must_use]
pub fn file() -> ResourceSchema {
    ResourceSchema {
        type_name: FILE.into(),
        collection: "files".into(),
        id_kind: IdKind::Text,
        singleton: false,
        fields: vec![
            FieldSpec::text("title"),
            FieldSpec::text("description"),
            FieldSpec::text("type"),
            FieldSpec::text("filename_disk"),
            FieldSpec::text("filename_download"),
            FieldSpec::text("storage"),
            FieldSpec::text("folder"),
            FieldSpec::raw_json("metadata"),
            FieldSpec::text("checksum"),
            FieldSpec::integer("width"),
            FieldSpec::integer("height"),
            FieldSpec::integer("filesize"),
            FieldSpec::integer("duration"),
            FieldSpec::text("uploaded_by").read_only(),
            FieldSpec::text("uploaded_on").read_only(),
            FieldSpec::text("modified_by").read_only(),
            FieldSpec::text("modified_on").read_only(),
        ],
        association: None,
        read_fields: None,
    }
}

/// All built-in kinds.
#[must_use]
pub fn all() -> Vec<ResourceSchema> {
    vec![role(), policy(), permission(), setting(), file()]
}

/// Looks up a built-in kind by name.
#[must_use]
pub fn by_name(name: &str) -> Option<ResourceSchema> {
    match name {
        ROLE => Some(role()),
        POLICY => Some(policy()),
        PERMISSION => Some(permission()),
        SETTING => Some(setting()),
        FILE => Some(file()),
        _ => None,
    }
}
