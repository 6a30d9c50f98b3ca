//! `google_project` and `google_project_organization_policy`.

use serde_json::{Map, Value, json};

use crate::assets::{BooleanPolicy, ListPolicy, OrgPolicy, RestoreDefault, Timestamp};
use crate::convert::{AssetFragment, AttrResult, Attributes, ConvertContext, ResourceConverter};
use crate::error::AttributeError;

use super::{BILLING_INFO_ASSET_TYPE, PROJECT_ASSET_TYPE, discovered, in_project, project_parent};

/// Converts `google_project` into a Project asset and, when a billing
/// account is set, a `ProjectBillingInfo` asset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Project;

/// Converts `google_project_organization_policy` into an org-policy
/// contribution on the Project asset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectOrganizationPolicy;

impl ResourceConverter for Project {
    fn convert(&self, attributes: &Value, context: &ConvertContext) -> AttrResult<Vec<AssetFragment>> {
        let attrs = Attributes::root(attributes)?;
        let project = context.project_or_default(attrs.opt_str("project_id")?);

        let mut data = Map::new();
        data.insert(String::from("projectId"), json!(project));
        if let Some(display_name) = attrs.opt_nonempty_str("name")? {
            data.insert(String::from("name"), json!(display_name));
        }
        let labels = attrs.string_map("labels")?;
        if !labels.is_empty() {
            data.insert(String::from("labels"), json!(labels));
        }
        // folder_id and org_id are mutually exclusive in valid configurations.
        let parent = match (attrs.opt_nonempty_str("folder_id")?, attrs.opt_nonempty_str("org_id")?) {
            (Some(folder), _) => Some(("folder", folder.trim_start_matches("folders/"))),
            (None, Some(org)) => Some(("organization", org.trim_start_matches("organizations/"))),
            (None, None) => None,
        };
        let parent_name = parent.map_or_else(String::new, |(kind, id)| {
            data.insert(String::from("parent"), json!({ "type": kind, "id": id }));
            format!("//cloudresourcemanager.googleapis.com/{kind}s/{id}")
        });

        let mut fragments = vec![
            AssetFragment::new(PROJECT_ASSET_TYPE, project_parent(project))
                .with_resource(discovered("cloudresourcemanager", "Project", parent_name, Value::Object(data))),
        ];

        if let Some(account) = attrs.opt_nonempty_str("billing_account")? {
            let account = account.trim_start_matches("billingAccounts/");
            let data = json!({
                "name": format!("projects/{project}/billingInfo"),
                "projectId": project,
                "billingAccountName": format!("billingAccounts/{account}"),
                "billingEnabled": true,
            });
            fragments.push(
                AssetFragment::new(
                    BILLING_INFO_ASSET_TYPE,
                    format!("//cloudbilling.googleapis.com/projects/{project}/billingInfo"),
                )
                .with_resource(discovered("cloudbilling", "ProjectBillingInfo", project_parent(project), data)),
            );
        }

        Ok(fragments
            .into_iter()
            .map(|fragment| in_project(fragment, project, context))
            .collect())
    }
}

impl ResourceConverter for ProjectOrganizationPolicy {
    fn convert(&self, attributes: &Value, context: &ConvertContext) -> AttrResult<Vec<AssetFragment>> {
        let attrs = Attributes::root(attributes)?;
        let project = context.project_or_default(
            attrs
                .opt_str("project")?
                .map(|p| p.trim_start_matches("projects/")),
        );
        let policy = org_policy_of(&attrs)?;

        let fragment =
            AssetFragment::new(PROJECT_ASSET_TYPE, project_parent(project)).with_org_policy(policy);
        Ok(vec![in_project(fragment, project, context)])
    }
}

/// Reads the org-policy attributes shared by every `*_organization_policy` type.
fn org_policy_of(attrs: &Attributes<'_>) -> AttrResult<OrgPolicy> {
    let constraint = attrs.str("constraint")?;
    let constraint = if constraint.starts_with("constraints/") {
        constraint.to_string()
    } else {
        format!("constraints/{constraint}")
    };

    let boolean_policy = attrs
        .block("boolean_policy")?
        .map(|block| -> AttrResult<BooleanPolicy> {
            Ok(BooleanPolicy {
                enforced: block.opt_bool("enforced")?.unwrap_or(false),
            })
        })
        .transpose()?;

    let list_policy = attrs
        .block("list_policy")?
        .map(|block| list_policy_of(&block))
        .transpose()?;

    let restore_default = attrs
        .block("restore_policy")?
        .map(|block| block.opt_bool("default"))
        .transpose()?
        .flatten()
        .filter(|restore| *restore)
        .map(|_| RestoreDefault {});

    let update_time = attrs
        .opt_nonempty_str("update_time")?
        .map(|value| {
            Timestamp::decode(value).map_err(|e| AttributeError::invalid("update_time", e.to_string()))
        })
        .transpose()?;

    Ok(OrgPolicy {
        constraint,
        list_policy,
        boolean_policy,
        restore_default,
        etag: attrs.opt_nonempty_str("etag")?.map(str::to_string),
        update_time,
    })
}

fn list_policy_of(block: &Attributes<'_>) -> AttrResult<ListPolicy> {
    let mut policy = ListPolicy {
        inherit_from_parent: block.opt_bool("inherit_from_parent")?.unwrap_or(false),
        suggested_value: block.opt_nonempty_str("suggested_value")?.map(str::to_string),
        ..ListPolicy::default()
    };

    if let Some(allow) = block.block("allow")? {
        if allow.opt_bool("all")?.unwrap_or(false) {
            policy.all_values = Some(String::from("ALLOW"));
        }
        policy.allowed_values = allow.string_list("values")?.into_iter().map(str::to_string).collect();
    }
    if let Some(deny) = block.block("deny")? {
        if deny.opt_bool("all")?.unwrap_or(false) {
            policy.all_values = Some(String::from("DENY"));
        }
        policy.denied_values = deny.string_list("values")?.into_iter().map(str::to_string).collect();
    }

    Ok(policy)
}
