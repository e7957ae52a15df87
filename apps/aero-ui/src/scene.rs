//! Scene composer: the centered mesh and the mapped streamlines drawn in one
//! frame with the egui painter.
//!
//! Both artifacts arrive already expressed in the scene frame (origin at the
//! mesh bounding-box center), so nothing here translates them relative to
//! each other. The camera only orbits and dollies around the origin.

use aero_geometry::NormalizedMesh;
use aero_results::MappedStreamlines;
use egui::{Color32, Pos2, Rect, Stroke};
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, UnitQuaternion, Vector3};

const FIELD_OF_VIEW_DEG: f32 = 60.0;
/// Half-extent of the simulation grid once mapped into the scene.
const GRID_HALF_EXTENT: f32 = 0.5;

/// A mesh ready for drawing: triangles reduced to unique edges once.
pub struct SceneMesh {
    pub mesh: NormalizedMesh,
    edges: Vec<[u32; 2]>,
}

impl SceneMesh {
    pub fn new(mesh: NormalizedMesh) -> Self {
        let edges = mesh.edges();
        Self { mesh, edges }
    }
}

pub struct SceneView {
    rotation: UnitQuaternion<f32>,
    zoom: f32,
    pub show_mesh: bool,
    pub show_streamlines: bool,
    pub show_grid_box: bool,
}

impl Default for SceneView {
    fn default() -> Self {
        Self {
            // Slightly from above and to the side.
            rotation: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.35)
                * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -0.6),
            zoom: 1.0,
            show_mesh: true,
            show_streamlines: true,
            show_grid_box: true,
        }
    }
}

impl SceneView {
    pub fn reset_camera(&mut self) {
        let defaults = Self::default();
        self.rotation = defaults.rotation;
        self.zoom = defaults.zoom;
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        mesh: Option<&SceneMesh>,
        streamlines: Option<&MappedStreamlines>,
    ) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());

        if response.dragged() {
            let delta = response.drag_delta();
            self.rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), delta.x * 0.01)
                * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), delta.y * 0.01)
                * self.rotation;
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.0 {
                self.zoom = (self.zoom * (1.0 + scroll * 0.002)).clamp(0.05, 50.0);
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_gray(18));

        let radius = scene_radius(mesh.map(|m| &m.mesh));
        let camera = Camera::new(rect, self.rotation, radius, self.zoom);

        if self.show_grid_box {
            draw_grid_box(&painter, &camera);
        }
        draw_axes(&painter, &camera, radius * 0.25);

        if self.show_mesh {
            if let Some(mesh) = mesh {
                draw_mesh(&painter, &camera, mesh);
            }
        }
        if self.show_streamlines {
            if let Some(streamlines) = streamlines {
                draw_streamlines(&painter, &camera, streamlines);
            }
        }

        if mesh.is_none() && streamlines.is_none() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open an STL file to begin",
                egui::FontId::proportional(16.0),
                Color32::GRAY,
            );
        }
    }
}

/// Radius of a sphere around the origin that holds everything worth framing.
fn scene_radius(mesh: Option<&NormalizedMesh>) -> f32 {
    let grid = GRID_HALF_EXTENT * 3f32.sqrt();
    let mesh_radius = mesh
        .map(|m| m.bounds().extents().norm() * 0.5)
        .unwrap_or(0.0);
    grid.max(mesh_radius)
}

struct Camera {
    rect: Rect,
    mvp: Matrix4<f32>,
}

impl Camera {
    fn new(rect: Rect, rotation: UnitQuaternion<f32>, radius: f32, zoom: f32) -> Self {
        let radius = radius.max(f32::EPSILON);
        let eye = Point3::new(0.0, 0.0, radius * 3.0 / zoom);
        let view = Isometry3::look_at_rh(&eye, &Point3::origin(), &Vector3::y());
        let aspect = (rect.width() / rect.height().max(1.0)).max(f32::EPSILON);
        let proj = Perspective3::new(
            aspect,
            FIELD_OF_VIEW_DEG.to_radians(),
            radius * 0.01,
            radius * 100.0 / zoom.min(1.0),
        );
        let mvp = proj.as_matrix() * view.to_homogeneous() * rotation.to_homogeneous();
        Self { rect, mvp }
    }

    /// Screen position of `p`, or `None` when it is behind the eye or outside
    /// the depth range.
    fn project(&self, p: &Point3<f32>) -> Option<Pos2> {
        let clip = self.mvp * p.to_homogeneous();
        if clip.w <= 0.0 || clip.z < -clip.w || clip.z > clip.w {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        let half = self.rect.size() * 0.5;
        Some(self.rect.center() + egui::vec2(ndc.x * half.x, -ndc.y * half.y))
    }

    fn segment(&self, painter: &egui::Painter, a: &Point3<f32>, b: &Point3<f32>, stroke: Stroke) {
        if let (Some(a), Some(b)) = (self.project(a), self.project(b)) {
            painter.line_segment([a, b], stroke);
        }
    }
}

fn draw_mesh(painter: &egui::Painter, camera: &Camera, mesh: &SceneMesh) {
    let stroke = Stroke::new(0.6, Color32::from_rgba_unmultiplied(190, 190, 200, 110));
    let vertices = &mesh.mesh.vertices;
    for [a, b] in &mesh.edges {
        camera.segment(painter, &vertices[*a as usize], &vertices[*b as usize], stroke);
    }
}

fn draw_streamlines(painter: &egui::Painter, camera: &Camera, streamlines: &MappedStreamlines) {
    let count = streamlines.len().max(1) as f32;
    for (index, line) in streamlines.polylines().iter().enumerate() {
        let color = streamline_color(index as f32 / count);
        let stroke = Stroke::new(1.4, color);
        // Break the polyline wherever a point cannot be projected.
        let mut run: Vec<Pos2> = Vec::with_capacity(line.len());
        for point in line {
            match camera.project(point) {
                Some(pos) => run.push(pos),
                None => flush_polyline(painter, &mut run, stroke),
            }
        }
        flush_polyline(painter, &mut run, stroke);
    }
}

fn flush_polyline(painter: &egui::Painter, run: &mut Vec<Pos2>, stroke: Stroke) {
    if run.len() >= 2 {
        painter.add(egui::Shape::line(std::mem::take(run), stroke));
    } else {
        run.clear();
    }
}

/// Blue to cyan to yellow across the streamline set.
fn streamline_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let (r, g, b) = if t < 0.5 {
        let u = t * 2.0;
        (40.0, 90.0 + 150.0 * u, 255.0 - 40.0 * u)
    } else {
        let u = (t - 0.5) * 2.0;
        (40.0 + 215.0 * u, 240.0, 215.0 - 175.0 * u)
    };
    Color32::from_rgb(r as u8, g as u8, b as u8)
}

fn draw_grid_box(painter: &egui::Painter, camera: &Camera) {
    let h = GRID_HALF_EXTENT;
    let corner = |i: usize| {
        Point3::new(
            if i & 1 == 0 { -h } else { h },
            if i & 2 == 0 { -h } else { h },
            if i & 4 == 0 { -h } else { h },
        )
    };
    let stroke = Stroke::new(0.8, Color32::from_gray(70));
    for i in 0..8 {
        for bit in [1, 2, 4] {
            let j = i | bit;
            if j != i {
                camera.segment(painter, &corner(i), &corner(j), stroke);
            }
        }
    }
}

fn draw_axes(painter: &egui::Painter, camera: &Camera, length: f32) {
    let origin = Point3::origin();
    let axes = [
        (Vector3::x(), Color32::from_rgb(220, 70, 70)),
        (Vector3::y(), Color32::from_rgb(70, 200, 90)),
        (Vector3::z(), Color32::from_rgb(80, 120, 240)),
    ];
    for (dir, color) in axes {
        camera.segment(painter, &origin, &(origin + dir * length), Stroke::new(1.5, color));
    }
}
