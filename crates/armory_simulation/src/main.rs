//! Headless симуляция ARMORY
//!
//! Bevy App без рендера + HeadlessHost: актёр берёт оружие, стреляет в стену,
//! потом роняет его на пол. 60Hz, ручной шаг времени.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use armory_simulation::host::mesh::{cube, deinterleave};
use armory_simulation::{
    create_headless_app, log_error, spawn_weapon_rig, Hand, HeadlessHost, HostServices,
    ObjectHandle, TriggerPulled, WeaponRig,
};

const WEAPON: ObjectHandle = ObjectHandle(1);
const TICKS: u32 = 1000;
const RELEASE_TICK: u32 = 600;

fn main() {
    let seed = 42;
    println!("Starting ARMORY headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));

    // Стена в 4м перед оружием
    let mut host = HeadlessHost::new();
    host.add_static_cuboid(Vec3::new(2.0, 2.0, 0.1), Transform::from_xyz(0.0, 1.5, -4.0));
    host.place_object(WEAPON, Transform::from_xyz(0.0, 1.5, 0.0));
    host.grab(Hand::Right, WEAPON);
    app.insert_resource(HostServices::new(host));

    // Render mesh "ствола" в формате хоста: xyz + normal, indexed
    let barrel = cube(1.0);
    let raw = barrel.interleaved(3);
    let hull = deinterleave(
        &raw,
        6,
        &barrel.indices,
        &Mat4::from_scale(Vec3::new(0.05, 0.08, 0.3)),
    );

    let weapon = match spawn_weapon_rig(app.world_mut(), WEAPON, &hull) {
        Ok(entity) => entity,
        Err(err) => {
            log_error(&format!("Weapon startup failed: {}", err));
            std::process::exit(1);
        }
    };

    for tick in 0..TICKS {
        // Очередь по 1 выстрелу в секунду, пока оружие в руке
        if tick % 60 == 10 && tick < RELEASE_TICK {
            app.world_mut().send_event(TriggerPulled { weapon });
        }

        if tick == RELEASE_TICK {
            if let Some(host) = app
                .world_mut()
                .resource_mut::<HostServices>()
                .downcast_mut::<HeadlessHost>()
            {
                host.release(Hand::Right);
            }
        }

        app.update();

        // Физика хоста шагает после weapon tick (роняет отпущенное оружие)
        if let Some(host) = app
            .world_mut()
            .resource_mut::<HostServices>()
            .downcast_mut::<HeadlessHost>()
        {
            host.step(1.0 / 60.0);
        }

        if tick % 100 == 0 {
            let Some(rig) = app.world().get::<WeaponRig>(weapon) else {
                continue;
            };
            let report = rig.last_report;
            println!(
                "Tick {}: {:?}, {} shots, {} explosions (mode {:?})",
                tick,
                report.grab,
                report.active_shots,
                report.active_effects,
                rig.simulation.body_mode()
            );
        }
    }

    println!("Simulation complete!");
}
