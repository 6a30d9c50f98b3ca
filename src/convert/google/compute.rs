//! `google_compute_disk`.

use serde_json::{Map, Value, json};

use crate::convert::{AssetFragment, AttrResult, Attributes, ConvertContext, ResourceConverter};

use super::{DISK_ASSET_TYPE, discovered, in_project, project_parent};

/// Converts `google_compute_disk` into a `compute.googleapis.com/Disk` asset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeDisk;

impl ResourceConverter for ComputeDisk {
    fn convert(&self, attributes: &Value, context: &ConvertContext) -> AttrResult<Vec<AssetFragment>> {
        let attrs = Attributes::root(attributes)?;
        let project = context.project_or_default(attrs.opt_str("project")?);
        let zone = attrs.str("zone")?;
        let name = attrs.str("name")?;

        let mut data = Map::new();
        data.insert(String::from("name"), json!(name));
        data.insert(
            String::from("zone"),
            json!(format!("projects/{project}/zones/{zone}")),
        );
        if let Some(disk_type) = attrs.opt_nonempty_str("type")? {
            data.insert(
                String::from("type"),
                json!(format!("projects/{project}/zones/{zone}/diskTypes/{disk_type}")),
            );
        }
        if let Some(size) = attrs.opt_i64("size")? {
            data.insert(String::from("sizeGb"), json!(size));
        }
        if let Some(image) = attrs.opt_nonempty_str("image")? {
            data.insert(String::from("sourceImage"), json!(image));
        }
        if let Some(snapshot) = attrs.opt_nonempty_str("snapshot")? {
            data.insert(String::from("sourceSnapshot"), json!(snapshot));
        }
        if let Some(description) = attrs.opt_nonempty_str("description")? {
            data.insert(String::from("description"), json!(description));
        }
        if let Some(block_size) = attrs.opt_i64("physical_block_size_bytes")? {
            data.insert(String::from("physicalBlockSizeBytes"), json!(block_size));
        }
        let labels = attrs.string_map("labels")?;
        if !labels.is_empty() {
            data.insert(String::from("labels"), json!(labels));
        }
        if let Some(key) = attrs.block("disk_encryption_key")?
            && let Some(kms) = key.opt_nonempty_str("kms_key_self_link")?
        {
            data.insert(
                String::from("diskEncryptionKey"),
                json!({ "kmsKeyName": kms }),
            );
        }

        let asset_name = format!("//compute.googleapis.com/projects/{project}/zones/{zone}/disks/{name}");
        let resource = discovered("compute", "Disk", project_parent(project), Value::Object(data));

        let fragment = AssetFragment::new(DISK_ASSET_TYPE, asset_name).with_resource(resource);
        Ok(vec![in_project(fragment, project, context)])
    }
}
