//! Globe scene setup, input and presentation systems

use bevy::color::{Alpha, Mix};
use bevy::input::touch::Touches;
use bevy::light::GlobalAmbientLight;
use bevy::picking::Pickable;
use bevy::picking::pointer::PointerId;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::geography::OutlineSet;
use crate::globe::config::GlobeConfig;
use crate::globe::controller::{InteractionMode, RotationController};
use crate::globe::gesture::PointerGesture;
use crate::globe::mesh::{outline_lines, pin_mesh, pin_transform, shell_grid};
use crate::globe::messages::{ClearLocation, CoordinateUpdated, FocusLocation, LocationUpdated};
use crate::globe::ripple::{RippleField, displace_positions};

/// Parent of every globe mesh; carries the controller rotation and hover scale.
#[derive(Component)]
pub struct GlobeRoot;

/// Opaque inner sphere that receives pointer input
#[derive(Component)]
pub struct GlobeCore;

#[derive(Component)]
pub struct LocationPin;

#[derive(Component)]
pub struct GlobeCamera;

/// Handles and undisplaced vertex positions of the rippling meshes
#[derive(Resource)]
pub struct GlobeGeometry {
    pub root: Entity,
    pub shell_mesh: Handle<Mesh>,
    pub shell_base: Vec<Vec3>,
    pub shell_material: Handle<StandardMaterial>,
    pub outline_mesh: Handle<Mesh>,
    pub outline_base: Vec<Vec3>,
    pub outline_revision: u64,
    pub pin_mesh: Handle<Mesh>,
    pub pin_material: Handle<StandardMaterial>,
    /// True while vertex positions differ from their base
    pub displaced: bool,
    scratch: Vec<[f32; 3]>,
}

/// Smoothed hover state, 0 = resting, 1 = hovered
#[derive(Resource, Default, Debug)]
pub struct HoverGlow {
    pub hovered: bool,
    pub level: f32,
}

pub fn spawn_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<GlobeConfig>,
) {
    let camera_distance = windows
        .single()
        .map(|w| config.camera_distance_for(w.width()))
        .unwrap_or(config.camera_distance);

    commands.insert_resource(GlobalAmbientLight {
        brightness: 400.0,
        ..default()
    });
    commands.spawn((
        PointLight {
            intensity: 1_500_000.0,
            range: 40.0,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 10.0),
    ));
    commands.spawn((
        PointLight {
            intensity: 500_000.0,
            range: 40.0,
            ..default()
        },
        Transform::from_xyz(-10.0, -10.0, -10.0),
    ));

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera_fov_deg.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, camera_distance).looking_at(Vec3::ZERO, Vec3::Y),
        GlobeCamera,
    ));

    let root = commands
        .spawn((
            Transform::from_scale(Vec3::splat(config.globe_scale)),
            Visibility::Visible,
            GlobeRoot,
            Name::new("Globe"),
        ))
        .id();

    commands
        .spawn((
            Mesh3d(meshes.add(Sphere::new(0.98).mesh().uv(32, 32))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::BLACK,
                unlit: true,
                ..default()
            })),
            GlobeCore,
            ChildOf(root),
            Name::new("Globe Core"),
        ))
        .observe(on_globe_press)
        .observe(|_: On<Pointer<Over>>, mut hover: ResMut<HoverGlow>| hover.hovered = true)
        .observe(|_: On<Pointer<Out>>, mut hover: ResMut<HoverGlow>| hover.hovered = false);

    let shell = shell_grid(1.0, config.shell_segments);
    let shell_mesh = meshes.add(shell.mesh);
    let shell_material = materials.add(StandardMaterial {
        base_color: config.shell_color.with_alpha(0.25),
        emissive: LinearRgba::from(config.shell_color) * config.shell_emissive,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    commands.spawn((
        Mesh3d(shell_mesh.clone()),
        MeshMaterial3d(shell_material.clone()),
        Pickable::IGNORE,
        ChildOf(root),
        Name::new("Globe Shell"),
    ));

    let outlines = outline_lines(&[], config.outline_relief);
    let outline_mesh = meshes.add(outlines.mesh);
    commands.spawn((
        Mesh3d(outline_mesh.clone()),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: config.outline_color,
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Pickable::IGNORE,
        ChildOf(root),
        Name::new("Continent Outlines"),
    ));

    let pin_material = materials.add(StandardMaterial {
        base_color: config.marker_color,
        emissive: LinearRgba::from(config.marker_color) * 0.5,
        ..default()
    });

    commands.insert_resource(GlobeGeometry {
        root,
        shell_mesh,
        shell_base: shell.base,
        shell_material,
        outline_mesh,
        outline_base: outlines.base,
        outline_revision: 0,
        pin_mesh: meshes.add(pin_mesh()),
        pin_material,
        displaced: false,
        scratch: Vec::new(),
    });

    info!("[INIT] Globe scene spawned");
}

/// Pointer-down on the globe: stop any flight and send one ripple from the hit point.
#[allow(clippy::too_many_arguments)]
fn on_globe_press(
    mut event: On<Pointer<Press>>,
    config: Res<GlobeConfig>,
    time: Res<Time>,
    touches: Res<Touches>,
    mut controller: ResMut<RotationController>,
    mut gesture: ResMut<PointerGesture>,
    mut ripples: ResMut<RippleField>,
    roots: Query<&GlobalTransform, With<GlobeRoot>>,
) {
    let position = event.pointer_location.position;
    match event.pointer_id {
        PointerId::Mouse => {
            if event.button != PointerButton::Primary {
                return;
            }
            gesture.press(position);
        }
        PointerId::Touch(id) => {
            if touches.iter().count() > 1 {
                return;
            }
            gesture.press_touch(id, position);
        }
        PointerId::Custom(_) => return,
    }

    controller.press(&config);

    if let Some(hit) = event.hit.position
        && let Ok(root) = roots.single()
    {
        let local = root.affine().inverse().transform_point3(hit);
        ripples.request(
            local,
            time.elapsed_secs_f64(),
            config.ripple_strength,
            config.ripple_capacity,
        );
    }
    event.propagate(false);
}

/// Follow the pressed pointer anywhere in the window and end the cycle on release.
pub fn track_pointer_drag(
    config: Res<GlobeConfig>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gesture: ResMut<PointerGesture>,
    mut controller: ResMut<RotationController>,
    mut ripples: ResMut<RippleField>,
) {
    if !gesture.is_pressed() {
        return;
    }

    let (position, released) = match gesture.touch_id() {
        Some(id) => (
            touches.get_pressed(id).map(|t| t.position()),
            touches.just_released(id) || touches.just_canceled(id) || touches.get_pressed(id).is_none(),
        ),
        None => (
            windows.single().ok().and_then(|w| w.cursor_position()),
            !buttons.pressed(MouseButton::Left),
        ),
    };

    if let Some(position) = position
        && let Some(delta) = gesture.motion(position, config.drag_threshold_px)
    {
        controller.drag_by(delta, &config);
    }

    if released {
        gesture.release();
        controller.release();
        ripples.rearm();
    }
}

/// Apply focus/clear requests and announce the focused location.
pub fn handle_location_requests(
    config: Res<GlobeConfig>,
    mut controller: ResMut<RotationController>,
    mut focus_requests: MessageReader<FocusLocation>,
    mut clear_requests: MessageReader<ClearLocation>,
    mut location_updates: MessageWriter<LocationUpdated>,
) {
    for request in focus_requests.read() {
        match controller.focus(&request.label, request.latitude, request.longitude) {
            Ok(Some(location)) => {
                info!(
                    "[GLOBE] focusing {} ({:.4}, {:.4})",
                    location.label,
                    location.point.latitude(),
                    location.point.longitude()
                );
                location_updates.write(LocationUpdated(Some(location)));
            }
            Ok(None) => {
                debug!("[GLOBE] focus on {} ignored while dragging", request.label);
            }
            Err(e) => {
                warn!("[GLOBE] ignoring focus request for {}: {}", request.label, e);
            }
        }
    }

    if clear_requests.read().count() > 0 {
        controller.clear(&config);
        location_updates.write(LocationUpdated(None));
    }
}

/// Keep the camera distance in line with the viewport width.
pub fn fit_camera_to_window(
    mut resized: MessageReader<WindowResized>,
    windows: Query<(), With<PrimaryWindow>>,
    config: Res<GlobeConfig>,
    mut camera: Single<&mut Transform, With<GlobeCamera>>,
) {
    let Some(width) = resized
        .read()
        .filter(|e| windows.contains(e.window))
        .last()
        .map(|e| e.width)
    else {
        return;
    };
    let distance = config.camera_distance_for(width);
    if (camera.translation.length() - distance).abs() > f32::EPSILON {
        **camera = Transform::from_xyz(0.0, 0.0, distance).looking_at(Vec3::ZERO, Vec3::Y);
    }
}

pub fn step_rotation(
    time: Res<Time>,
    config: Res<GlobeConfig>,
    mut controller: ResMut<RotationController>,
    mut coordinates: MessageWriter<CoordinateUpdated>,
    mut last_mode: Local<InteractionMode>,
) {
    let (lat, long) = controller.step(time.delta(), &config);
    coordinates.write(CoordinateUpdated { lat, long });

    let mode = controller.state.mode;
    if mode != *last_mode {
        debug!("[GLOBE] {:?} -> {:?} at ({:.2}, {:.2})", *last_mode, mode, lat, long);
        *last_mode = mode;
    }
}

pub fn sync_globe_transform(
    config: Res<GlobeConfig>,
    controller: Res<RotationController>,
    hover: Res<HoverGlow>,
    mut roots: Query<&mut Transform, With<GlobeRoot>>,
) {
    let scale = config.globe_scale * (1.0 + (config.hover_scale - 1.0) * hover.level);
    for mut transform in roots.iter_mut() {
        transform.rotation = controller.state.rotation();
        transform.scale = Vec3::splat(scale);
    }
}

/// Ease the hover glow toward its target and tint the shell.
pub fn update_hover_glow(
    time: Res<Time>,
    config: Res<GlobeConfig>,
    geometry: Res<GlobeGeometry>,
    mut hover: ResMut<HoverGlow>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let target = if hover.hovered { 1.0 } else { 0.0 };
    if (hover.level - target).abs() < 1e-4 {
        if hover.level != target {
            hover.level = target;
        } else {
            return;
        }
    } else {
        let blend = 1.0 - (-config.hover_response * time.delta_secs()).exp();
        hover.level += (target - hover.level) * blend;
    }

    if let Some(mut material) = materials.get_mut(&geometry.shell_material) {
        let color = config.shell_color.mix(&config.shell_hover_color, hover.level);
        let emissive = config.shell_emissive
            + (config.shell_hover_emissive - config.shell_emissive) * hover.level;
        material.base_color = color.with_alpha(0.25);
        material.emissive = LinearRgba::from(color) * emissive;
    }
}

/// Rebuild the outline mesh whenever the loaded outline set changes.
pub fn rebuild_outlines(
    config: Res<GlobeConfig>,
    outlines: Res<OutlineSet>,
    mut geometry: ResMut<GlobeGeometry>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    if outlines.revision == geometry.outline_revision {
        return;
    }
    let lines = outline_lines(&outlines.paths, config.outline_relief);
    if let Some(mut mesh) = meshes.get_mut(&geometry.outline_mesh) {
        *mesh = lines.mesh;
    }
    geometry.outline_base = lines.base;
    geometry.outline_revision = outlines.revision;
    // New base positions need a fresh displacement pass
    geometry.displaced = true;
    info!(
        "[GLOBE] outline mesh rebuilt: {} segments",
        geometry.outline_base.len() / 2
    );
}

/// Recompute rippled vertex positions from their bases, restoring them once all ripples expire.
pub fn apply_ripples(
    time: Res<Time>,
    config: Res<GlobeConfig>,
    mut ripples: ResMut<RippleField>,
    mut geometry: ResMut<GlobeGeometry>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let now = time.elapsed_secs_f64();
    ripples.prune(now, config.ripple_lifetime_secs);
    if ripples.is_empty() && !geometry.displaced {
        return;
    }

    let lifetime = config.ripple_lifetime_secs as f32;
    let geometry = &mut *geometry;

    displace_positions(
        &geometry.shell_base,
        &ripples,
        now,
        config.shell_ripple_intensity,
        lifetime,
        &mut geometry.scratch,
    );
    if let Some(mut mesh) = meshes.get_mut(&geometry.shell_mesh) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, geometry.scratch.clone());
    }

    displace_positions(
        &geometry.outline_base,
        &ripples,
        now,
        config.outline_ripple_intensity,
        lifetime,
        &mut geometry.scratch,
    );
    if let Some(mut mesh) = meshes.get_mut(&geometry.outline_mesh) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, geometry.scratch.clone());
    }

    geometry.displaced = !ripples.is_empty();
}

/// Spawn or remove the pin as the focused location changes.
pub fn sync_location_pin(
    mut commands: Commands,
    geometry: Res<GlobeGeometry>,
    mut updates: MessageReader<LocationUpdated>,
    pins: Query<Entity, With<LocationPin>>,
) {
    let Some(LocationUpdated(latest)) = updates.read().last() else {
        return;
    };

    for pin in pins.iter() {
        commands.entity(pin).despawn();
    }

    if let Some(location) = latest {
        commands.spawn((
            Mesh3d(geometry.pin_mesh.clone()),
            MeshMaterial3d(geometry.pin_material.clone()),
            pin_transform(location.point.latitude(), location.point.longitude()),
            Pickable::IGNORE,
            LocationPin,
            ChildOf(geometry.root),
            Name::new(format!("Pin: {}", location.label)),
        ));
    }
}
