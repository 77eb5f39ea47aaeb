//! Rapier 2D backend для physics query adapter
//!
//! Архитектура:
//! - `RapierQuery`: `PhysicsQuery` поверх `RapierContext` (shape cast + raycast)
//! - Sense: Rapier `Velocity` → `PlayerBody`, затем сенсоры
//! - Integrate: `PlayerBody` → Rapier `Velocity` (Rapier step интегрирует сам)
//!
//! Сам `RapierPhysicsPlugin` добавляет хост (scale, fixed schedule).
//! Без rapier context сенсоры не обновляются (показания остаются прежними).

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::{sense, CastHit, PhysicsQuery, PlayerBody, RayCast, SensorReadings, ShapeCast};
use crate::collision_layers::{
    get_layer_name, LayerMask, COLLISION_LAYER_PLAYER, COLLISION_MASK_GROUND,
};
use crate::controller::{ControllerConfig, PlayerController, PlayerControllerSet, PlayerInput};
use crate::logger::log;
use crate::tools::CurrentTool;

/// Layer mask → Rapier query filter (тело игрока исключено из своих же сенсоров)
fn filter_for(mask: LayerMask, exclude: Option<Entity>) -> QueryFilter<'static> {
    let groups = CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask));
    let filter = QueryFilter::new().groups(groups);

    match exclude {
        Some(entity) => filter.exclude_collider(entity),
        None => filter,
    }
}

/// PhysicsQuery поверх Rapier context
pub struct RapierQuery<'a, 'w> {
    context: &'a RapierContext<'w>,
    exclude: Option<Entity>,
}

impl<'a, 'w> RapierQuery<'a, 'w> {
    pub fn new(context: &'a RapierContext<'w>) -> Self {
        Self {
            context,
            exclude: None,
        }
    }

    /// Игнорировать collider этой entity (тело самого игрока)
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }
}

impl PhysicsQuery for RapierQuery<'_, '_> {
    fn shape_cast(&self, cast: &ShapeCast) -> Option<CastHit> {
        let half = cast.box_size * 0.5;
        let shape = Collider::cuboid(half.x, half.y);
        let options = ShapeCastOptions {
            max_time_of_impact: cast.max_distance,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        // direction нормализован → time of impact = пройденная дистанция
        let (_, hit) = self.context.cast_shape(
            cast.origin,
            cast.angle,
            cast.direction,
            &*shape.raw,
            options,
            filter_for(cast.layer_mask, self.exclude),
        )?;

        let distance = hit.time_of_impact;
        let (point, normal) = match hit.details {
            Some(details) => (details.witness1, details.normal1),
            None => (cast.origin + cast.direction * distance, -cast.direction),
        };

        Some(CastHit {
            point,
            normal,
            distance,
        })
    }

    fn ray_cast(&self, ray: &RayCast) -> Option<CastHit> {
        let (_, intersection) = self.context.cast_ray_and_get_normal(
            ray.origin,
            ray.direction,
            ray.max_distance,
            true,
            filter_for(ray.layer_mask, self.exclude),
        )?;

        Some(CastHit {
            point: intersection.point,
            normal: intersection.normal,
            distance: intersection.time_of_impact,
        })
    }
}

/// Система: Rapier Velocity → PlayerBody (перед логикой контроллера)
pub fn pull_velocity_from_rapier(mut bodies: Query<(&Velocity, &mut PlayerBody)>) {
    for (velocity, mut body) in bodies.iter_mut() {
        body.velocity = velocity.linvel;
    }
}

/// Система: PlayerBody → Rapier Velocity (после логики контроллера)
pub fn push_velocity_to_rapier(mut bodies: Query<(&PlayerBody, &mut Velocity)>) {
    for (body, mut velocity) in bodies.iter_mut() {
        velocity.linvel = body.velocity;
    }
}

/// Система: сенсоры игрока через Rapier spatial queries
pub fn sense_with_rapier(
    rapier: ReadRapierContext,
    mut players: Query<(
        Entity,
        &Transform,
        &ControllerConfig,
        &PlayerController,
        &PlayerInput,
        &CurrentTool,
        &mut SensorReadings,
    )>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, transform, config, controller, input, tool, mut readings) in players.iter_mut() {
        let query = RapierQuery::new(&context).excluding(entity);
        *readings = sense(
            &query,
            config,
            transform.translation.truncate(),
            controller.facing,
            input.aim_point,
            tool.0.range,
        );
    }
}

/// Rapier тело игрока: dynamic, без вращения, box collider на player слое
pub fn insert_rapier_body(commands: &mut Commands, entity: Entity, half_extents: Vec2) {
    commands.entity(entity).insert((
        RigidBody::Dynamic,
        Collider::cuboid(half_extents.x, half_extents.y),
        LockedAxes::ROTATION_LOCKED,
        Velocity::zero(),
        CollisionGroups::new(
            Group::from_bits_truncate(COLLISION_LAYER_PLAYER),
            Group::from_bits_truncate(COLLISION_MASK_GROUND),
        ),
    ));

    log(&format!(
        "🧱 Rapier body for {:?} on layer {}",
        entity,
        get_layer_name(COLLISION_LAYER_PLAYER)
    ));
}

/// Rapier backend контроллера (вместо `HeadlessPhysicsPlugin`)
pub struct RapierSensingPlugin;

impl Plugin for RapierSensingPlugin {
    fn build(&self, app: &mut App) {
        // Update: capture (jump release) тоже трогает velocity
        app.add_systems(
            Update,
            (
                (pull_velocity_from_rapier, sense_with_rapier)
                    .chain()
                    .in_set(PlayerControllerSet::Sense),
                push_velocity_to_rapier.in_set(PlayerControllerSet::Integrate),
            ),
        )
        .add_systems(
            FixedUpdate,
            (
                (pull_velocity_from_rapier, sense_with_rapier)
                    .chain()
                    .in_set(PlayerControllerSet::Sense),
                push_velocity_to_rapier.in_set(PlayerControllerSet::Integrate),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::ecs::system::RunSystemOnce;
    use bevy::time::TimeUpdateStrategy;
    use bevy::transform::TransformPlugin;

    use super::*;
    use crate::collision_layers::{COLLISION_LAYER_DIGGABLE, COLLISION_LAYER_GROUND, COLLISION_MASK_DIG};
    use crate::controller::{Facing, Player};

    /// Центр тела игрока: ступни на 0.4, пол на 0.0, стена справа с x = 0.5
    const PLAYER_POSITION: Vec2 = Vec2::new(0.0, 0.85);

    /// Ответы Rapier на все запросы контроллера
    struct RapierAnswers {
        ground: Option<CastHit>,
        climb_right: Option<CastHit>,
        climb_left: Option<CastHit>,
        aim: Option<CastHit>,
        down_without_exclusion: Option<CastHit>,
        down_excluding_player: Option<CastHit>,
    }

    fn ask_rapier(rapier: ReadRapierContext, players: Query<Entity, With<Player>>) -> RapierAnswers {
        let context = rapier.single().expect("rapier context");
        let player = players.single().expect("player");
        let config = ControllerConfig::default();

        let query = RapierQuery::new(&context);
        let own = RapierQuery::new(&context).excluding(player);

        let aim_ray = RayCast::toward(PLAYER_POSITION, Vec2::new(3.0, 0.85), 5.0, COLLISION_MASK_DIG)
            .expect("aim direction");
        // Маска с player слоем: без exclude ray начинается внутри своего же collider'а
        let down = RayCast {
            origin: PLAYER_POSITION,
            direction: Vec2::NEG_Y,
            max_distance: 2.0,
            layer_mask: COLLISION_LAYER_PLAYER | COLLISION_MASK_GROUND,
        };

        RapierAnswers {
            ground: own.shape_cast(&ShapeCast::ground(&config, PLAYER_POSITION)),
            climb_right: own.shape_cast(&ShapeCast::climb(&config, PLAYER_POSITION, Facing::Right)),
            climb_left: own.shape_cast(&ShapeCast::climb(&config, PLAYER_POSITION, Facing::Left)),
            aim: own.ray_cast(&aim_ray),
            down_without_exclusion: query.ray_cast(&down),
            down_excluding_player: own.ray_cast(&down),
        }
    }

    fn create_rapier_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            TransformPlugin,
            RapierPhysicsPlugin::<NoUserData>::default(),
        ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));

        // Пол: верхняя грань y = 0
        app.world_mut().spawn((
            Transform::from_xyz(0.0, -0.5, 0.0),
            Collider::cuboid(5.0, 0.5),
            CollisionGroups::new(Group::from_bits_truncate(COLLISION_LAYER_GROUND), Group::ALL),
        ));
        // Стена справа: левая грань x = 0.5
        app.world_mut().spawn((
            Transform::from_xyz(1.0, 3.0, 0.0),
            Collider::cuboid(0.5, 3.0),
            CollisionGroups::new(Group::from_bits_truncate(COLLISION_LAYER_DIGGABLE), Group::ALL),
        ));

        let player = app
            .world_mut()
            .spawn((Player, Transform::from_translation(PLAYER_POSITION.extend(0.0))))
            .id();
        insert_rapier_body(&mut app.world_mut().commands(), player, Vec2::new(0.3, 0.45));
        app.world_mut().entity_mut(player).insert(GravityScale(0.0));
        app.world_mut().flush();

        for _ in 0..3 {
            app.update();
        }
        app
    }

    #[test]
    fn test_rapier_query_against_real_context() {
        let mut app = create_rapier_app();
        let answers = app
            .world_mut()
            .run_system_once(ask_rapier)
            .expect("rapier queries");

        let ground = answers.ground.expect("ground cast should hit the floor");
        assert!((ground.distance - 0.8).abs() < 0.01);
        assert!(ground.normal.y.abs() > 0.99);

        let wall = answers.climb_right.expect("climb cast should hit the wall");
        assert!((wall.distance - 0.45).abs() < 0.01);
        assert!(answers.climb_left.is_none());

        let aim = answers.aim.expect("aim ray should hit the wall");
        assert!((aim.point.x - 0.5).abs() < 0.01);
        assert!((aim.normal - Vec2::NEG_X).length() < 0.01);
        assert!((aim.distance - 0.5).abs() < 0.01);

        // Без exclude первым попадается сам игрок
        let own_body = answers.down_without_exclusion.expect("player collider");
        assert_eq!(own_body.distance, 0.0);

        let floor = answers.down_excluding_player.expect("floor below the player");
        assert!((floor.distance - 0.85).abs() < 0.01);
        assert!(floor.normal.y > 0.99);
    }

    #[test]
    fn test_velocity_sync_round_trip_through_app() {
        let mut app = App::new();
        app.add_systems(Update, (pull_velocity_from_rapier, push_velocity_to_rapier).chain());

        let entity = app
            .world_mut()
            .spawn((
                PlayerBody::default(),
                Velocity::linear(Vec2::new(1.0, -2.0)),
            ))
            .id();

        app.update();

        let body = app.world().get::<PlayerBody>(entity).unwrap();
        assert_eq!(body.velocity, Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_filter_groups_follow_mask() {
        let filter = filter_for(COLLISION_MASK_GROUND, None);
        let groups = filter.groups.unwrap();

        assert_eq!(groups.memberships, Group::ALL);
        assert!(groups.filters.contains(Group::from_bits_truncate(COLLISION_LAYER_GROUND)));
        assert!(groups.filters.contains(Group::from_bits_truncate(COLLISION_LAYER_DIGGABLE)));
        assert!(!groups.filters.contains(Group::from_bits_truncate(COLLISION_LAYER_PLAYER)));
    }
}
