//! Headless soak симуляция DEEPDIG
//!
//! Контроллер против scripted мира (пол + стена + diggable блоки) на N тиков
//! со случайным seeded input. Печатает сколько notifications каждого вида ушло.
//!
//! Usage: deepdig_simulation [seed] [ticks]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use deepdig_simulation::scripted::drive_scripted_input;
use deepdig_simulation::{
    create_headless_app, log_info, spawn_player, AnimationCallback, AnimationCue, ControllerConfig,
    DigTilemap, HeadlessPhysicsPlugin, Inventory, NotificationBus, NotificationKind,
    PlayerControllerSet, SimulationPlugin,
};

/// Fake animator: каждый Dig cue сразу отыгрывает impact frame + конец анимации
fn scripted_animator(mut cues: EventReader<AnimationCue>, mut callbacks: EventWriter<AnimationCallback>) {
    for cue in cues.read() {
        if let AnimationCue::Dig { entity, .. } = *cue {
            callbacks.write(AnimationCallback::DigImpactFrame { entity });
            callbacks.write(AnimationCallback::DigAnimationEnded { entity });
        }
    }
}

fn scripted_world() -> DigTilemap {
    DigTilemap::new(1.0)
        // Пол
        .with_rect(IVec2::new(-20, -4), IVec2::new(20, -1))
        // Стена справа (для climb)
        .with_rect(IVec2::new(8, 0), IVec2::new(9, 6))
        // Стена слева
        .with_rect(IVec2::new(-10, 0), IVec2::new(-9, 6))
}

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(42);
    let ticks: usize = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(3000);

    println!("Starting DEEPDIG headless soak (seed: {}, ticks: {})", seed, ticks);

    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessPhysicsPlugin))
        .insert_resource(scripted_world())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_systems(PreUpdate, drive_scripted_input)
        .add_systems(Update, scripted_animator.after(PlayerControllerSet::Capture));

    // Счётчики notifications по видам
    let counters: Vec<(NotificationKind, Arc<AtomicUsize>)> = NotificationKind::ALL
        .iter()
        .map(|kind| (*kind, Arc::new(AtomicUsize::new(0))))
        .collect();

    {
        let mut bus = app.world_mut().resource_mut::<NotificationBus>();
        for (kind, counter) in &counters {
            let counter = counter.clone();
            bus.subscribe(*kind, move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
    }

    let player = {
        let world = app.world_mut();
        let player = spawn_player(
            &mut world.commands(),
            Vec3::new(0.5, 0.9, 0.0),
            ControllerConfig::default(),
        );
        world.flush();
        player
    };

    for tick in 0..ticks {
        app.update();

        if tick % 500 == 0 {
            let world = app.world();
            let position = world
                .get::<Transform>(player)
                .map(|transform| transform.translation)
                .unwrap_or_default();
            let stamina = world.get::<Inventory>(player).map(|inventory| inventory.stamina);
            log_info(&format!(
                "Tick {}: player at {:?}, stamina {:?}",
                tick, position, stamina
            ));
        }
    }

    for (kind, counter) in &counters {
        println!("{:?} notifications: {}", kind, counter.load(Ordering::Relaxed));
    }
    println!("Soak complete!");
}
