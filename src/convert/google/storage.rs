//! `google_storage_bucket`.
//!
//! Bucket names are often computed (`name = "${var.prefix}-${count.index}"`)
//! and therefore unknown at plan time; such buckets are recorded under the
//! placeholder name [`UNKNOWN_BUCKET`] so that their configuration can still
//! be validated.

use serde_json::{Map, Value, json};

use crate::convert::{AssetFragment, AttrResult, Attributes, ConvertContext, ResourceConverter};

use super::{BUCKET_ASSET_TYPE, discovered, in_project, project_parent};

/// Placeholder used when a bucket name is unknown until apply.
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Converts `google_storage_bucket` into a `storage.googleapis.com/Bucket` asset.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageBucket;

/// Full asset name of a bucket.
pub(super) fn bucket_asset_name(bucket: &str) -> String {
    format!("//storage.googleapis.com/{bucket}")
}

impl ResourceConverter for StorageBucket {
    fn convert(&self, attributes: &Value, context: &ConvertContext) -> AttrResult<Vec<AssetFragment>> {
        let attrs = Attributes::root(attributes)?;
        let project = context.project_or_default(attrs.opt_str("project")?);
        let name = attrs.opt_nonempty_str("name")?.unwrap_or(UNKNOWN_BUCKET);

        let mut data = Map::new();
        data.insert(String::from("name"), json!(name));
        if let Some(location) = attrs.opt_nonempty_str("location")? {
            data.insert(String::from("location"), json!(location.to_uppercase()));
        }
        if let Some(class) = attrs.opt_nonempty_str("storage_class")? {
            data.insert(String::from("storageClass"), json!(class));
        }
        let labels = attrs.string_map("labels")?;
        if !labels.is_empty() {
            data.insert(String::from("labels"), json!(labels));
        }
        if let Some(hold) = attrs.opt_bool("default_event_based_hold")? {
            data.insert(String::from("defaultEventBasedHold"), json!(hold));
        }
        if let Some(pays) = attrs.opt_bool("requester_pays")? {
            data.insert(String::from("billing"), json!({ "requesterPays": pays }));
        }
        if let Some(uniform) = attrs.opt_bool("uniform_bucket_level_access")? {
            data.insert(
                String::from("iamConfiguration"),
                json!({ "uniformBucketLevelAccess": { "enabled": uniform } }),
            );
        }

        if let Some(versioning) = attrs.block("versioning")? {
            data.insert(
                String::from("versioning"),
                json!({ "enabled": versioning.opt_bool("enabled")?.unwrap_or(false) }),
            );
        }
        if let Some(website) = attrs.block("website")? {
            data.insert(String::from("website"), website_of(&website)?);
        }
        if let Some(logging) = attrs.block("logging")? {
            data.insert(String::from("logging"), logging_of(&logging)?);
        }
        // A key created in the same plan is unknown until apply.
        if let Some(encryption) = attrs.block("encryption")?
            && let Some(key) = encryption.opt_nonempty_str("default_kms_key_name")?
        {
            data.insert(String::from("encryption"), json!({ "defaultKmsKeyName": key }));
        }
        if let Some(retention) = attrs.block("retention_policy")? {
            let mut policy = Map::new();
            if let Some(period) = retention.opt_i64("retention_period")? {
                policy.insert(String::from("retentionPeriod"), json!(period.to_string()));
            }
            if let Some(locked) = retention.opt_bool("is_locked")? {
                policy.insert(String::from("isLocked"), json!(locked));
            }
            data.insert(String::from("retentionPolicy"), Value::Object(policy));
        }

        let cors = attrs
            .blocks("cors")?
            .iter()
            .map(cors_of)
            .collect::<AttrResult<Vec<_>>>()?;
        if !cors.is_empty() {
            data.insert(String::from("cors"), Value::Array(cors));
        }

        let rules = attrs
            .blocks("lifecycle_rule")?
            .iter()
            .map(lifecycle_rule_of)
            .collect::<AttrResult<Vec<_>>>()?;
        if !rules.is_empty() {
            data.insert(String::from("lifecycle"), json!({ "rule": rules }));
        }

        let resource = discovered("storage", "Bucket", project_parent(project), Value::Object(data));

        let fragment =
            AssetFragment::new(BUCKET_ASSET_TYPE, bucket_asset_name(name)).with_resource(resource);
        Ok(vec![in_project(fragment, project, context)])
    }
}

fn website_of(website: &Attributes<'_>) -> AttrResult<Value> {
    let mut out = Map::new();
    if let Some(suffix) = website.opt_str("main_page_suffix")? {
        out.insert(String::from("mainPageSuffix"), json!(suffix));
    }
    if let Some(page) = website.opt_str("not_found_page")? {
        out.insert(String::from("notFoundPage"), json!(page));
    }
    Ok(Value::Object(out))
}

fn logging_of(logging: &Attributes<'_>) -> AttrResult<Value> {
    let mut out = Map::new();
    out.insert(String::from("logBucket"), json!(logging.str("log_bucket")?));
    if let Some(prefix) = logging.opt_str("log_object_prefix")? {
        out.insert(String::from("logObjectPrefix"), json!(prefix));
    }
    Ok(Value::Object(out))
}

fn cors_of(cors: &Attributes<'_>) -> AttrResult<Value> {
    let mut out = Map::new();
    out.insert(String::from("origin"), json!(cors.string_list("origin")?));
    out.insert(String::from("method"), json!(cors.string_list("method")?));
    out.insert(
        String::from("responseHeader"),
        json!(cors.string_list("response_header")?),
    );
    if let Some(max_age) = cors.opt_i64("max_age_seconds")? {
        out.insert(String::from("maxAgeSeconds"), json!(max_age));
    }
    Ok(Value::Object(out))
}

fn lifecycle_rule_of(rule: &Attributes<'_>) -> AttrResult<Value> {
    let mut action = Map::new();
    if let Some(block) = rule.block("action")? {
        action.insert(String::from("type"), json!(block.str("type")?));
        if let Some(class) = block.opt_nonempty_str("storage_class")? {
            action.insert(String::from("storageClass"), json!(class));
        }
    }

    let mut condition = Map::new();
    if let Some(block) = rule.block("condition")? {
        if let Some(age) = block.opt_i64("age")? {
            condition.insert(String::from("age"), json!(age));
        }
        if let Some(created) = block.opt_nonempty_str("created_before")? {
            condition.insert(String::from("createdBefore"), json!(created));
        }
        let live = match block.opt_str("with_state")? {
            Some("LIVE") => Some(true),
            Some("ARCHIVED") => Some(false),
            _ => block.opt_bool("is_live")?,
        };
        if let Some(live) = live {
            condition.insert(String::from("isLive"), json!(live));
        }
        if let Some(versions) = block.opt_i64("num_newer_versions")? {
            condition.insert(String::from("numNewerVersions"), json!(versions));
        }
        let classes = block.string_list("matches_storage_class")?;
        if !classes.is_empty() {
            condition.insert(String::from("matchesStorageClass"), json!(classes));
        }
    }

    Ok(json!({ "action": action, "condition": condition }))
}
