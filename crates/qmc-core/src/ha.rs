// ── HA replication-node panel ──
//
// View-model for a BDB HA virtual host node: its summary fields, the two
// environment configuration grids, and the replication group members grid.
// Each refresh runs through `GridStore::sync`, so a grid is only redrawn
// when its content actually changed.

use serde_json::{Map, Value};
use strum::{Display, EnumString};
use tracing::debug;

use qmc_api::ModelObject;

use crate::error::CoreError;
use crate::flatten::config_rows;
use crate::grid::{GridStore, Row, RowSet, display_value, row_str, rows_from_value};

/// Node attributes shown in the panel summary, in display order.
pub const NODE_FIELDS: [&str; 9] = [
    "storePath",
    "groupName",
    "role",
    "address",
    "coalescingSync",
    "designatedPrimary",
    "durability",
    "priority",
    "quorumOverride",
];

/// Attributes of the local node that appear in the members grid.
pub const MEMBER_FIELDS: [&str; 7] = [
    "id",
    "name",
    "groupName",
    "address",
    "role",
    "joinTime",
    "lastKnownReplicationTransactionId",
];

/// Group size from which priority and quorum override apply instead of
/// designated primary.
const QUORUM_GROUP_SIZE: usize = 3;

pub const DELETE_NODE_WARNING: &str = "Deletion of virtual host node will delete both configuration and message data.\n\nAre you sure you want to delete virtual host node?";

/// Replication role reported by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeRole {
    Master,
    Replica,
    Waiting,
    Detached,
    Unreachable,
    Unknown,
}

impl NodeRole {
    /// Parse a role attribute; unrecognised or missing roles yield `None`.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        value.and_then(Value::as_str).and_then(|s| s.parse().ok())
    }
}

/// Which group-size dependent attributes the panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuorumLayout {
    /// Two-node (or unknown-size) group: designated primary applies.
    #[default]
    DesignatedPrimary,
    /// Three or more nodes: priority and quorum override apply.
    PriorityAndQuorum,
}

impl QuorumLayout {
    pub fn for_members(count: Option<usize>) -> Self {
        match count {
            Some(n) if n >= QUORUM_GROUP_SIZE => Self::PriorityAndQuorum,
            _ => Self::DesignatedPrimary,
        }
    }

    pub fn shows_designated_primary(self) -> bool {
        self == Self::DesignatedPrimary
    }

    pub fn shows_priority(self) -> bool {
        self == Self::PriorityAndQuorum
    }

    pub fn shows_quorum_override(self) -> bool {
        self == Self::PriorityAndQuorum
    }

    /// Whether `field` from `NODE_FIELDS` is visible under this layout.
    pub fn shows_field(self, field: &str) -> bool {
        match field {
            "designatedPrimary" => self.shows_designated_primary(),
            "priority" => self.shows_priority(),
            "quorumOverride" => self.shows_quorum_override(),
            _ => true,
        }
    }
}

/// Which grids need redrawing after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelRefresh {
    pub environment: bool,
    pub replicated_environment: bool,
    pub members: bool,
    /// A grid was shown or hidden without its rows being replaced.
    pub visibility: bool,
}

impl PanelRefresh {
    pub fn any(self) -> bool {
        self.environment || self.replicated_environment || self.members || self.visibility
    }
}

/// Sync `store`, noting in `visibility` whether it was shown or hidden.
fn sync_grid(store: &mut GridStore, rows: Option<RowSet>, visibility: &mut bool) -> bool {
    let was_visible = store.is_visible();
    let replaced = store.sync(rows);
    *visibility |= was_visible != store.is_visible();
    replaced
}

/// State of the replication-node panel across refreshes.
#[derive(Debug, Default)]
pub struct ReplicationNodePanel {
    data: Option<Value>,
    environment: GridStore,
    replicated_environment: GridStore,
    members: GridStore,
    layout: QuorumLayout,
}

impl ReplicationNodePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply freshly loaded node data.
    pub fn update(&mut self, data: &Value) -> PanelRefresh {
        let members = member_rows(data);
        self.layout = QuorumLayout::for_members(members.as_ref().map(Vec::len));

        let mut visibility = false;
        let environment = sync_grid(
            &mut self.environment,
            Some(config_rows(object_at(data, "environmentConfiguration"))),
            &mut visibility,
        );
        let replicated_environment = sync_grid(
            &mut self.replicated_environment,
            Some(config_rows(object_at(data, "replicatedEnvironmentConfiguration"))),
            &mut visibility,
        );
        let members = sync_grid(&mut self.members, members, &mut visibility);
        let refresh = PanelRefresh {
            environment,
            replicated_environment,
            members,
            visibility,
        };
        self.data = Some(data.clone());
        debug!(
            node = self.name().unwrap_or_default(),
            ?refresh,
            "replication node panel updated"
        );
        refresh
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.data.as_ref()?.get("name")?.as_str()
    }

    pub fn role(&self) -> Option<NodeRole> {
        NodeRole::from_value(self.data.as_ref()?.get("role"))
    }

    /// Summary fields visible under the current layout, as display text.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        NODE_FIELDS
            .iter()
            .filter(|field| self.layout.shows_field(field))
            .map(|field| {
                let value = self.data.as_ref().and_then(|d| d.get(*field));
                (*field, field_text(value))
            })
            .collect()
    }

    pub fn layout(&self) -> QuorumLayout {
        self.layout
    }

    /// The local node may not be deleted while it is the master.
    pub fn delete_enabled(&self) -> bool {
        self.role() != Some(NodeRole::Master)
    }

    pub fn environment(&self) -> &GridStore {
        &self.environment
    }

    pub fn replicated_environment(&self) -> &GridStore {
        &self.replicated_environment
    }

    pub fn members(&self) -> &GridStore {
        &self.members
    }

    /// Actions available for `selected` members of this node's group.
    pub fn member_actions(&self, selected: &[Row]) -> MemberActions {
        MemberActions::for_selection(selected, self.name().unwrap_or_default())
    }

    /// The group member called `name`.
    pub fn member(&self, name: &str) -> Result<&Row, CoreError> {
        self.members
            .rows()
            .iter()
            .find(|row| row_str(row, "name") == Some(name))
            .ok_or_else(|| CoreError::NotFound {
                category: "Replication node".into(),
                name: name.to_owned(),
            })
    }

    /// Fails unless mastership may be transferred to member `name`.
    pub fn ensure_transfer_allowed(&self, name: &str) -> Result<(), CoreError> {
        let member = self.member(name)?;
        if self.member_actions(std::slice::from_ref(member)).transfer_master {
            Ok(())
        } else {
            Err(CoreError::NotAllowed {
                message: format!("node '{name}' is not a replica"),
            })
        }
    }

    /// Fails unless member `name` may be removed from the group.
    pub fn ensure_remove_allowed(&self, name: &str) -> Result<(), CoreError> {
        let member = self.member(name)?;
        if self.member_actions(std::slice::from_ref(member)).remove_node {
            Ok(())
        } else {
            Err(CoreError::NotAllowed {
                message: format!("node '{name}' is the master or the local node"),
            })
        }
    }

    /// Fails while the local node is the master.
    pub fn ensure_delete_allowed(&self) -> Result<(), CoreError> {
        if self.delete_enabled() {
            Ok(())
        } else {
            Err(CoreError::NotAllowed {
                message: "the master node cannot be deleted".into(),
            })
        }
    }
}

fn object_at<'a>(data: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    data.get(key).and_then(Value::as_object)
}

/// Remote replication nodes followed by the local node, or `None` when the
/// node reports no group membership.
fn member_rows(data: &Value) -> Option<RowSet> {
    let mut members = rows_from_value(data.get("remotereplicationnodes"))?;
    let local: Row = MEMBER_FIELDS
        .iter()
        .filter_map(|field| data.get(*field).map(|v| ((*field).to_owned(), v.clone())))
        .collect();
    members.push(local);
    Some(members)
}

/// Display text of a node attribute; booleans read `yes`/`no`.
pub fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Bool(true)) => "yes".into(),
        Some(Value::Bool(false)) => "no".into(),
        other => display_value(other),
    }
}

// ── Member actions ──

/// Which member-grid buttons are enabled for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemberActions {
    pub transfer_master: bool,
    pub remove_node: bool,
}

impl MemberActions {
    pub fn for_selection(selected: &[Row], local_name: &str) -> Self {
        let [member] = selected else {
            return Self::default();
        };
        let role = NodeRole::from_value(member.get("role"));
        Self {
            transfer_master: role == Some(NodeRole::Replica),
            remove_node: role != Some(NodeRole::Master) && row_str(member, "name") != Some(local_name),
        }
    }
}

/// The object a node-level request addresses: the virtual host node itself
/// when `remote` is the local node, otherwise the replication node beneath it.
pub fn node_target(node: &str, remote: &str) -> ModelObject {
    let local = ModelObject::new("virtualhostnode", node);
    if node == remote {
        local
    } else {
        ModelObject::new("replicationnode", remote).child_of(local)
    }
}

/// Attributes sent to make a node the group master.
pub fn transfer_master_body() -> Value {
    serde_json::json!({ "role": NodeRole::Master.to_string() })
}

pub fn transfer_master_prompt(name: &str) -> String {
    format!("Are you sure you would like to transfer mastership to node '{name}'?")
}

pub fn remove_node_prompt(name: &str) -> String {
    format!("Are you sure you would like to delete node '{name}'?")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(remotes: Option<Value>) -> Value {
        let mut data = json!({
            "id": "n1-id",
            "name": "node1",
            "groupName": "group",
            "address": "localhost:5000",
            "role": "MASTER",
            "joinTime": 1_420_070_400_000_u64,
            "lastKnownReplicationTransactionId": 42,
            "storePath": "/var/qpid/node1",
            "designatedPrimary": true,
            "priority": 1,
            "quorumOverride": 0,
            "environmentConfiguration": {"je.cleaner.threads": "2"},
            "replicatedEnvironmentConfiguration": {}
        });
        if let Some(remotes) = remotes {
            data["remotereplicationnodes"] = remotes;
        }
        data
    }

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn members_include_local_node_last() {
        let mut panel = ReplicationNodePanel::new();
        let refresh = panel.update(&node(Some(json!([
            {"name": "node2", "role": "REPLICA", "address": "h2:5000"}
        ]))));

        assert!(refresh.members);
        let members = panel.members().rows();
        assert_eq!(members.len(), 2);
        assert_eq!(row_str(&members[1], "name"), Some("node1"));
        assert_eq!(members[1].get("lastKnownReplicationTransactionId"), Some(&json!(42)));
        assert!(members[1].get("storePath").is_none());
    }

    #[test]
    fn missing_remotes_hide_members() {
        let mut panel = ReplicationNodePanel::new();
        let refresh = panel.update(&node(None));
        assert!(!refresh.members);
        assert!(!panel.members().is_visible());
        assert_eq!(panel.layout(), QuorumLayout::DesignatedPrimary);
    }

    #[test]
    fn config_grids_follow_data() {
        let mut panel = ReplicationNodePanel::new();
        let refresh = panel.update(&node(Some(json!([]))));
        assert!(refresh.environment);
        assert!(panel.environment().is_visible());
        assert!(!refresh.replicated_environment);
        assert!(!panel.replicated_environment().is_visible());
    }

    #[test]
    fn unchanged_refresh_redraws_nothing() {
        let mut panel = ReplicationNodePanel::new();
        let data = node(Some(json!([{"name": "node2", "role": "REPLICA"}])));
        panel.update(&data);
        let refresh = panel.update(&data);
        assert!(!refresh.any());
    }

    #[test]
    fn vanished_data_hides_grids_and_signals_redraw() {
        let mut panel = ReplicationNodePanel::new();
        panel.update(&node(Some(json!([{"name": "node2", "role": "REPLICA"}]))));
        assert!(panel.environment().is_visible());
        assert!(panel.members().is_visible());

        let mut bare = node(None);
        bare.as_object_mut().unwrap().remove("environmentConfiguration");
        let refresh = panel.update(&bare);

        assert!(!refresh.environment);
        assert!(!refresh.members);
        assert!(refresh.visibility);
        assert!(refresh.any());
        assert!(!panel.environment().is_visible());
        assert!(!panel.members().is_visible());
        assert_eq!(panel.environment().len(), 1);

        let refresh = panel.update(&bare);
        assert!(!refresh.any());
    }

    #[test]
    fn reappearing_rows_signal_visibility_only() {
        let mut panel = ReplicationNodePanel::new();
        let full = node(Some(json!([{"name": "node2"}])));
        panel.update(&full);
        panel.update(&node(None));

        let refresh = panel.update(&full);
        assert!(!refresh.members);
        assert!(refresh.visibility);
        assert!(panel.members().is_visible());
    }

    #[test]
    fn layout_switches_at_three_members() {
        let mut panel = ReplicationNodePanel::new();
        panel.update(&node(Some(json!([{"name": "node2"}]))));
        assert_eq!(panel.layout(), QuorumLayout::DesignatedPrimary);
        let names: Vec<&str> = panel.fields().iter().map(|(f, _)| *f).collect();
        assert!(names.contains(&"designatedPrimary"));
        assert!(!names.contains(&"priority"));

        panel.update(&node(Some(json!([{"name": "node2"}, {"name": "node3"}]))));
        assert_eq!(panel.layout(), QuorumLayout::PriorityAndQuorum);
        let names: Vec<&str> = panel.fields().iter().map(|(f, _)| *f).collect();
        assert!(!names.contains(&"designatedPrimary"));
        assert!(names.contains(&"priority"));
        assert!(names.contains(&"quorumOverride"));
    }

    #[test]
    fn field_text_renders_booleans() {
        let mut panel = ReplicationNodePanel::new();
        panel.update(&node(None));
        let fields = panel.fields();
        let designated = fields.iter().find(|(f, _)| *f == "designatedPrimary").unwrap();
        assert_eq!(designated.1, "yes");
        let sync = fields.iter().find(|(f, _)| *f == "coalescingSync").unwrap();
        assert_eq!(sync.1, "");
    }

    #[test]
    fn master_cannot_be_deleted() {
        let mut panel = ReplicationNodePanel::new();
        panel.update(&node(None));
        assert!(!panel.delete_enabled());

        let mut replica = node(None);
        replica["role"] = json!("REPLICA");
        panel.update(&replica);
        assert!(panel.delete_enabled());
    }

    #[test]
    fn member_actions() {
        let replica = row(json!({"name": "node2", "role": "REPLICA"}));
        let master = row(json!({"name": "node3", "role": "MASTER"}));
        let local = row(json!({"name": "node1", "role": "REPLICA"}));
        let unreachable = row(json!({"name": "node4", "role": "UNREACHABLE"}));

        assert_eq!(
            MemberActions::for_selection(std::slice::from_ref(&replica), "node1"),
            MemberActions { transfer_master: true, remove_node: true }
        );
        assert_eq!(
            MemberActions::for_selection(std::slice::from_ref(&master), "node1"),
            MemberActions::default()
        );
        assert_eq!(
            MemberActions::for_selection(std::slice::from_ref(&local), "node1"),
            MemberActions { transfer_master: true, remove_node: false }
        );
        assert_eq!(
            MemberActions::for_selection(std::slice::from_ref(&unreachable), "node1"),
            MemberActions { transfer_master: false, remove_node: true }
        );
        assert_eq!(MemberActions::for_selection(&[replica, unreachable], "node1"), MemberActions::default());
        assert_eq!(MemberActions::for_selection(&[], "node1"), MemberActions::default());
    }

    #[test]
    fn member_guards() {
        let mut panel = ReplicationNodePanel::new();
        panel.update(&node(Some(json!([
            {"name": "node2", "role": "REPLICA"},
            {"name": "node3", "role": "UNREACHABLE"}
        ]))));

        assert!(panel.ensure_transfer_allowed("node2").is_ok());
        assert!(matches!(
            panel.ensure_transfer_allowed("node3"),
            Err(CoreError::NotAllowed { .. })
        ));
        assert!(panel.ensure_remove_allowed("node3").is_ok());
        assert!(panel.ensure_remove_allowed("node1").is_err());
        assert!(matches!(
            panel.ensure_remove_allowed("node9"),
            Err(CoreError::NotFound { .. })
        ));
        assert!(panel.ensure_delete_allowed().is_err());
    }

    #[test]
    fn request_targets() {
        assert_eq!(node_target("node1", "node1").to_string(), "virtualhostnode/node1");
        assert_eq!(node_target("node1", "node2").to_string(), "replicationnode/node1/node2");
    }

    #[test]
    fn prompts_and_body() {
        assert_eq!(
            transfer_master_prompt("node2"),
            "Are you sure you would like to transfer mastership to node 'node2'?"
        );
        assert_eq!(remove_node_prompt("node2"), "Are you sure you would like to delete node 'node2'?");
        assert_eq!(transfer_master_body(), json!({"role": "MASTER"}));
    }
}
