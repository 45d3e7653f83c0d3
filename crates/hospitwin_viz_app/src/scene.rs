// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless scene: the render objects the frame loop animates.
//!
//! The scene is an explicit registry. Construction hands the patient handles
//! straight to the scheduler, nothing is ever looked up by name.

use hospitwin_viz_animation::{PatientTransform, TransformSink, Zone, ZoneLayout};
use hospitwin_viz_telemetry::{RenderCounters, ResourceCounters};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

/// Triangles in one patient capsule
const PATIENT_TRIANGLES: u64 = 320;
/// Triangles in one zone floor marker
const ZONE_TRIANGLES: u64 = 64;
/// Triangles in the progress bar
const BAR_TRIANGLES: u64 = 12;

/// Unique identifier for a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// What a node draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)] // Payloads are read by inspection code and tests
pub enum NodeKind {
    /// Floor marker for a zone
    Zone(Zone),
    /// Patient figure, by registry index
    Patient(usize),
    /// Cycle progress bar
    ProgressBar,
}

/// Node transform shared between the scene and its handles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    /// World-space position
    pub position: [f32; 3],
    /// Heading about +Y in radians
    pub yaw: f32,
    /// Per-axis scale
    pub scale: [f32; 3],
    /// Whether the node is drawn
    pub visible: bool,
}

impl NodeTransform {
    fn at(position: [f32; 3], visible: bool) -> Self {
        Self {
            position,
            yaw: 0.0,
            scale: [1.0, 1.0, 1.0],
            visible,
        }
    }
}

/// A node in the scene registry
#[derive(Debug)]
#[allow(dead_code)] // `kind` is read by inspection code and tests
pub struct SceneNode {
    /// Node kind
    pub kind: NodeKind,
    /// Shared transform
    pub transform: Arc<Mutex<NodeTransform>>,
    /// Triangles drawn when visible
    pub triangles: u64,
}

/// Write handle for one patient's node
#[derive(Debug, Clone)]
pub struct PatientHandle {
    /// Node the handle writes to
    pub id: NodeId,
    transform: Arc<Mutex<NodeTransform>>,
}

impl TransformSink for PatientHandle {
    fn set_transform(&mut self, transform: PatientTransform) {
        let mut node = self.transform.lock();
        node.position = transform.position;
        node.yaw = transform.yaw;
        node.visible = true;
    }
}

/// Counters the headless renderer keeps for the last frame
#[derive(Debug, Clone, Default)]
pub struct SceneCounters {
    latest: Arc<Mutex<RenderCounters>>,
}

impl ResourceCounters for SceneCounters {
    fn render_counters(&self) -> RenderCounters {
        *self.latest.lock()
    }
}

/// Headless scene owning every render object
#[derive(Debug)]
pub struct HeadlessScene {
    nodes: IndexMap<NodeId, SceneNode>,
    progress_bar: NodeId,
    counters: SceneCounters,
}

impl HeadlessScene {
    /// Build zone markers, the progress bar and `patient_count` patients.
    ///
    /// Returns the scene and the patient handles in registry order. Patients
    /// start hidden at the entrance until the scheduler first places them.
    pub fn build(layout: &ZoneLayout, patient_count: usize) -> (Self, Vec<PatientHandle>) {
        let mut nodes = IndexMap::new();

        for zone in Zone::ALL {
            nodes.insert(
                NodeId::new(),
                SceneNode {
                    kind: NodeKind::Zone(zone),
                    transform: Arc::new(Mutex::new(NodeTransform::at(layout.waypoint(zone), true))),
                    triangles: ZONE_TRIANGLES,
                },
            );
        }

        let progress_bar = NodeId::new();
        nodes.insert(
            progress_bar,
            SceneNode {
                kind: NodeKind::ProgressBar,
                transform: Arc::new(Mutex::new(NodeTransform::at([0.0, 4.0, -6.0], true))),
                triangles: BAR_TRIANGLES,
            },
        );

        let mut handles = Vec::with_capacity(patient_count);
        for index in 0..patient_count {
            let id = NodeId::new();
            let transform = Arc::new(Mutex::new(NodeTransform::at(layout.entrance, false)));
            nodes.insert(
                id,
                SceneNode {
                    kind: NodeKind::Patient(index),
                    transform: Arc::clone(&transform),
                    triangles: PATIENT_TRIANGLES,
                },
            );
            handles.push(PatientHandle { id, transform });
        }

        tracing::info!(nodes = nodes.len(), patients = patient_count, "headless scene built");

        let scene = Self {
            nodes,
            progress_bar,
            counters: SceneCounters::default(),
        };
        (scene, handles)
    }

    /// Counter source to attach to the telemetry sampler
    pub fn counters(&self) -> SceneCounters {
        self.counters.clone()
    }

    /// Stretch the progress bar along X
    pub fn set_progress_scale(&self, scale: f32) {
        if let Some(node) = self.nodes.get(&self.progress_bar) {
            node.transform.lock().scale[0] = scale;
        }
    }

    /// "Draw" the frame: tally what a renderer would submit
    pub fn render(&self) -> RenderCounters {
        let mut counters = RenderCounters {
            geometries: 3,
            ..RenderCounters::default()
        };
        for node in self.nodes.values() {
            if node.transform.lock().visible {
                counters.draw_calls += 1;
                counters.triangles += node.triangles;
            }
        }
        *self.counters.latest.lock() = counters;
        counters
    }

    /// Get a node by ID
    #[allow(dead_code)] // Inspection API, used by tests
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Current transform of a node
    #[allow(dead_code)] // Inspection API, used by tests
    pub fn transform(&self, id: NodeId) -> Option<NodeTransform> {
        self.nodes.get(&id).map(|node| *node.transform.lock())
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// ID of the progress bar node
    #[allow(dead_code)] // Inspection API, used by tests
    pub fn progress_bar(&self) -> NodeId {
        self.progress_bar
    }

    /// Drop the scene, releasing handles handed back by the scheduler
    pub fn teardown(self, handles: Vec<PatientHandle>) {
        let released = handles
            .iter()
            .filter(|handle| self.nodes.contains_key(&handle.id))
            .count();
        tracing::info!(released, nodes = self.nodes.len(), "scene torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registers_every_node() {
        let (scene, handles) = HeadlessScene::build(&ZoneLayout::default(), 4);
        assert_eq!(handles.len(), 4);
        assert_eq!(scene.node_count(), 5 + 1 + 4);
        for (index, handle) in handles.iter().enumerate() {
            let node = scene.node(handle.id).unwrap();
            assert_eq!(node.kind, NodeKind::Patient(index));
            assert!(!node.transform.lock().visible);
        }
    }

    #[test]
    fn test_handle_writes_through_to_scene() {
        let (scene, mut handles) = HeadlessScene::build(&ZoneLayout::default(), 1);
        handles[0].set_transform(PatientTransform {
            position: [1.0, 0.0, 2.0],
            yaw: 0.25,
        });
        let node = scene.transform(handles[0].id).unwrap();
        assert_eq!(node.position, [1.0, 0.0, 2.0]);
        assert_eq!(node.yaw, 0.25);
        assert!(node.visible);
    }

    #[test]
    fn test_render_counts_visible_nodes() {
        let (scene, mut handles) = HeadlessScene::build(&ZoneLayout::default(), 3);
        let hidden = scene.render();
        assert_eq!(hidden.draw_calls, 6);
        assert_eq!(hidden.triangles, 5 * ZONE_TRIANGLES + BAR_TRIANGLES);

        handles[1].set_transform(PatientTransform::default());
        let counters = scene.counters();
        scene.render();
        let latest = counters.render_counters();
        assert_eq!(latest.draw_calls, 7);
        assert_eq!(latest.triangles, hidden.triangles + PATIENT_TRIANGLES);
        assert!(counters.memory().is_none());
    }

    #[test]
    fn test_progress_scale() {
        let (scene, _) = HeadlessScene::build(&ZoneLayout::default(), 0);
        scene.set_progress_scale(0.5);
        let bar = scene.transform(scene.progress_bar()).unwrap();
        assert_eq!(bar.scale, [0.5, 1.0, 1.0]);
    }
}
