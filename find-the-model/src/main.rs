use anyhow::{Context, Result};
use glam::{Affine3A, Vec3};
use log::info;
use rapier3d::prelude::{ColliderBuilder, RigidBodyBuilder};
use target_grab::{
    components::{Handedness, Holder, Info, Panel, Transform},
    config::SceneDescription,
    contexts::{AudioContext, ClipHandle},
    hecs::Entity,
    Session, SessionBuilder,
};

static SCENE: &str = r#"{
    "config": { "raycast_distance": 2.5 },
    "slots": [
        { "name": "Bench", "translation": [-1.5, 0.9, -1.2] },
        { "name": "Shelf", "translation": [-0.9, 1.4, -1.5] },
        { "name": "Sink", "translation": [-0.3, 0.9, -1.2] },
        { "name": "Desk", "translation": [0.3, 0.8, -1.0] },
        { "name": "Cabinet", "translation": [0.9, 1.2, -1.5] },
        { "name": "Window", "translation": [1.5, 1.5, -1.8] }
    ]
}"#;

const CORRECT_CLIP: ClipHandle = ClipHandle(1);
const DEFAULT_CLIP: ClipHandle = ClipHandle(0);

pub fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = SceneDescription::from_json(SCENE).context("Parsing the scene")?;
    let mut builder = SessionBuilder::from_scene(scene);
    builder.audio_context(AudioContext::new(Some(CORRECT_CLIP), Some(DEFAULT_CLIP)));
    let mut session = builder.build();

    for name in ["A", "B", "C", "D"] {
        session.add_grabbable(
            name,
            Some(RigidBodyBuilder::dynamic().build()),
            Some(ColliderBuilder::cuboid(0.1, 0.1, 0.1).build()),
        );
    }
    session.add_pointer(Handedness::Left.into());
    session.add_pointer(Handedness::Right.into());
    let panel = session.add_display_panel();
    session.start()?;

    // A hand grabs the wrong object first, then lets it go
    let target = session.current_target().context("No target was chosen")?;
    let wrong = *session
        .target_registry
        .pool()
        .iter()
        .find(|e| **e != target)
        .context("Pool has a single member")?;
    session.input_context.hand_select(wrong);
    tick(&mut session, None)?;
    info!("Holding {} by hand: {:?}", name(&session, wrong), session.current_holder(wrong));
    session.input_context.hand_unselect(wrong);
    tick(&mut session, None)?;

    // The right hand controller finds the target three times in a row
    for round in 1..=3 {
        let target = session.current_target().context("No target was chosen")?;
        info!(
            "Round {round}: the panel reads \"{}\"",
            session.world.get::<&Panel>(panel)?.text
        );

        let translation = session.world.get::<&Transform>(target)?.translation;
        let aim = Affine3A::from_translation(translation + Vec3::new(0., 0., 1.));
        tick(&mut session, Some((aim, false)))?;
        tick(&mut session, Some((aim, true)))?;
        tick(&mut session, Some((aim, false)))?;

        let clips = session.audio_context.drain_clips();
        info!("Found {} and heard {clips:?}", name(&session, target));
    }

    // Nobody can take an object a device is already holding
    let contested = session.target_registry.pool()[0];
    session.pick_up(contested, Holder::Device(Handedness::Left.into()));
    let stolen = session.pick_up(contested, Holder::Hand);
    info!(
        "{} is held by {:?}, hand grab accepted: {stolen}",
        name(&session, contested),
        session.current_holder(contested)
    );

    Ok(())
}

/// Advance the session with the right hand controller at `right`, if given
fn tick(session: &mut Session, right: Option<(Affine3A, bool)>) -> Result<()> {
    let left = Handedness::Left.into();
    let left_pose = session
        .input_context
        .device(left)
        .map(|d| d.global_from_device())
        .unwrap_or(Affine3A::IDENTITY);
    session.input_context.update_device(left, false, left_pose)?;

    let (right_pose, pressed) = right.unwrap_or((Affine3A::from_translation(Vec3::Y), false));
    session
        .input_context
        .update_device(Handedness::Right.into(), pressed, right_pose)?;

    session.tick();
    Ok(())
}

fn name(session: &Session, entity: Entity) -> String {
    session
        .world
        .get::<&Info>(entity)
        .map(|i| i.name.clone())
        .unwrap_or_default()
}
