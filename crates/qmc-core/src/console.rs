// ── Console facade ──
//
// Single entry point consumers use to talk to a broker: loads the data
// behind each panel, drives the dialogs, and performs node operations.
// Broker metadata is fetched once per console and cached.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use qmc_api::{LoadOptions, ManagementClient, Metadata, ModelObject};

use crate::config::ConsoleConfig;
use crate::delete::{DEFAULT_ID_PARAM, DeletePlan};
use crate::dialog::group_provider::{GROUP_PROVIDER_CATEGORY, GROUP_PROVIDER_PATH};
use crate::dialog::jmx::{JMX_PLUGIN_TYPE, PLUGIN_CATEGORY};
use crate::dialog::{GroupProviderDialog, JmxPluginDialog, Submission};
use crate::error::CoreError;
use crate::flatten::flatten_statistics;
use crate::grid::{RowSet, rows_from_value};
use crate::ha::{PanelRefresh, ReplicationNodePanel, node_target, transfer_master_body};
use crate::naming::{TypeOption, sorted_type_options};
use crate::report::StatusHandlers;

/// Category name used in messages about virtual host nodes.
pub const VIRTUAL_HOST_NODE: &str = "virtualHostNode";

/// How a failed object load surfaces.
#[derive(Debug, Clone, Copy)]
enum LoadFailure {
    Missing,
    Reported,
}

/// Cheaply cloneable handle on one broker's management interface.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    client: ManagementClient,
    metadata: OnceCell<Metadata>,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let client = ManagementClient::new(config.url.clone(), &config.transport())?;
        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                client,
                metadata: OnceCell::new(),
            }),
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ManagementClient {
        &self.inner.client
    }

    /// Broker metadata, fetched on first use.
    pub async fn metadata(&self) -> Result<&Metadata, CoreError> {
        self.inner
            .metadata
            .get_or_try_init(|| async {
                debug!("fetching broker metadata");
                self.inner.client.metadata().await
            })
            .await
            .map_err(CoreError::from)
    }

    /// Load one object, mapping an empty answer or a 404 to `NotFound`.
    async fn load_one(
        &self,
        obj: &ModelObject,
        category: &str,
        options: LoadOptions,
    ) -> Result<Value, CoreError> {
        let not_found = || CoreError::NotFound {
            category: category.to_owned(),
            name: obj.name.clone(),
        };
        match self.inner.client.load(obj, options).await {
            Ok(items) => items.into_iter().next().ok_or_else(not_found),
            Err(e) => {
                let handlers = StatusHandlers::new(LoadFailure::Reported).on(404, LoadFailure::Missing);
                match *handlers.select(&e) {
                    LoadFailure::Missing => Err(not_found()),
                    LoadFailure::Reported => Err(e.into()),
                }
            }
        }
    }

    // ── HA replication node ──────────────────────────────────────────

    /// Load a BDB HA virtual host node with its replication group, with
    /// statistics hoisted into each object.
    pub async fn replication_node(&self, node: &str) -> Result<Value, CoreError> {
        let obj = ModelObject::new("virtualhostnode", node);
        let mut data = self
            .load_one(&obj, VIRTUAL_HOST_NODE, LoadOptions::default().with_depth(1))
            .await?;
        flatten_statistics(&mut data);
        Ok(data)
    }

    /// Reload `node` into `panel`.
    pub async fn refresh_panel(
        &self,
        panel: &mut ReplicationNodePanel,
        node: &str,
    ) -> Result<PanelRefresh, CoreError> {
        let data = self.replication_node(node).await?;
        Ok(panel.update(&data))
    }

    /// Make `remote` the master of `node`'s group.
    pub async fn transfer_mastership(&self, node: &str, remote: &str) -> Result<(), CoreError> {
        info!(node, remote, "transferring mastership");
        self.inner
            .client
            .update(&node_target(node, remote), &transfer_master_body())
            .await?;
        Ok(())
    }

    /// Remove `remote` from `node`'s replication group.
    pub async fn remove_replication_node(&self, node: &str, remote: &str) -> Result<(), CoreError> {
        info!(node, remote, "removing replication node");
        self.inner.client.delete(&node_target(node, remote)).await?;
        Ok(())
    }

    /// Delete the virtual host node itself, configuration and messages included.
    pub async fn delete_virtual_host_node(&self, node: &str) -> Result<(), CoreError> {
        info!(node, "deleting virtual host node");
        self.inner.client.delete(&node_target(node, node)).await?;
        Ok(())
    }

    // ── Group providers ──────────────────────────────────────────────

    pub async fn list_group_providers(&self) -> Result<RowSet, CoreError> {
        let items = self
            .inner
            .client
            .list(GROUP_PROVIDER_PATH, None, LoadOptions::default())
            .await?;
        Ok(rows_from_value(Some(&Value::Array(items))).unwrap_or_default())
    }

    pub async fn group_provider_types(&self) -> Result<Vec<TypeOption>, CoreError> {
        Ok(sorted_type_options(self.metadata().await?, GROUP_PROVIDER_CATEGORY))
    }

    pub async fn open_group_provider_add(&self) -> Result<GroupProviderDialog, CoreError> {
        Ok(GroupProviderDialog::add(self.metadata().await?))
    }

    /// Open the edit dialog on the actual (unresolved) values of provider `name`.
    pub async fn open_group_provider_edit(&self, name: &str) -> Result<GroupProviderDialog, CoreError> {
        let obj = ModelObject::new(GROUP_PROVIDER_PATH, name);
        let actual = self
            .load_one(&obj, GROUP_PROVIDER_CATEGORY, LoadOptions::actuals())
            .await?;
        let actual = into_object(actual, &obj)?;
        Ok(GroupProviderDialog::edit(self.metadata().await?, actual))
    }

    /// Validate the dialog and send its create or update request.
    pub async fn submit_group_provider(&self, dialog: &GroupProviderDialog) -> Result<Submission, CoreError> {
        let submission = dialog.submit()?;
        match (&submission, dialog.target()) {
            (Submission::Create(values), _) => {
                info!(name = ?values.get("name"), "creating group provider");
                self.inner.client.create(GROUP_PROVIDER_PATH, None, values).await?;
            }
            (Submission::Update(values), Some(obj)) => {
                info!(%obj, "updating group provider");
                self.inner.client.update(&obj, values).await?;
            }
            (Submission::Update(_), None) => {
                return Err(CoreError::ValidationFailed {
                    message: "group provider has no name".into(),
                });
            }
        }
        Ok(submission)
    }

    // ── JMX management plugin ────────────────────────────────────────

    pub async fn open_jmx_editor(&self, plugin: &str) -> Result<JmxPluginDialog, CoreError> {
        let obj = ModelObject::new("plugin", plugin);
        let actual = self
            .load_one(&obj, PLUGIN_CATEGORY, LoadOptions::actuals())
            .await?;
        let actual = into_object(actual, &obj)?;
        if actual.get("type").and_then(Value::as_str) != Some(JMX_PLUGIN_TYPE) {
            return Err(CoreError::NotAllowed {
                message: format!("plugin '{plugin}' is not a {JMX_PLUGIN_TYPE} plugin"),
            });
        }
        Ok(JmxPluginDialog::new(obj, self.metadata().await?, actual))
    }

    /// Send the attributes changed in `dialog`; returns what was sent.
    pub async fn save_jmx(&self, dialog: &JmxPluginDialog) -> Result<Map<String, Value>, CoreError> {
        let changes = dialog.save()?;
        if changes.is_empty() {
            debug!(plugin = %dialog.target(), "no changes to save");
        } else {
            self.inner.client.update(dialog.target(), &changes).await?;
        }
        Ok(changes)
    }

    // ── Deletion ─────────────────────────────────────────────────────

    /// Delete the objects in `plan` from the `category` collection under `parent`.
    pub async fn delete_objects(
        &self,
        category: &str,
        parent: Option<&ModelObject>,
        plan: &DeletePlan,
        id_param: Option<&str>,
    ) -> Result<(), CoreError> {
        info!(category, names = ?plan.names(), "deleting objects");
        self.inner
            .client
            .remove(category, parent, id_param.unwrap_or(DEFAULT_ID_PARAM), &plan.ids())
            .await?;
        Ok(())
    }

    /// Delete the objects in `plan` through a console-relative collection `url`.
    pub async fn delete_rows(&self, url: &str, plan: &DeletePlan, id_param: Option<&str>) -> Result<(), CoreError> {
        let reference = plan.query(url, id_param);
        info!(%reference, "deleting rows");
        self.inner.client.delete_reference(&reference).await?;
        Ok(())
    }
}

fn into_object(value: Value, obj: &ModelObject) -> Result<Map<String, Value>, CoreError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::Api {
            message: format!("unexpected response for {obj}"),
            status: None,
        }),
    }
}
