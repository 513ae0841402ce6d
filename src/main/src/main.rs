use tessera_ecs::component::Component;
use tessera_ecs::manager::Manager;
use tessera_ecs::schema::SchemaBuilder;

#[derive(Debug, Default, Clone, Copy)]
struct Health {
    value: f32,
}
impl Component for Health {}

#[derive(Debug, Default, Clone, Copy)]
struct Circle {
    radius: f32,
}
impl Component for Circle {}

#[derive(Debug, Default, Clone, Copy)]
struct Input {
    key: f32,
}
impl Component for Input {}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let mut builder = SchemaBuilder::new();
    let health = builder.register::<Health>()?;
    let circle = builder.register::<Circle>()?;
    let input = builder.register::<Input>()?;
    let velocity = builder.signature("velocity", &[input, circle])?;
    let life = builder.signature("life", &[health])?;

    let mut manager = Manager::new(builder.build());
    println!("After manager instantiated");
    println!("{}", manager.state_dump());

    let hero = manager.create_index();
    println!("After the entity at position 0 is created");
    println!("{}", manager.state_dump());

    let hero_health = manager.add_component(hero, Health { value: 80.0 });
    hero_health.value -= 15.0;
    assert!(manager.has_component::<Health>(hero));
    assert!(!manager.has_component::<Input>(hero));
    assert!(manager.matches_signature(hero, life));

    let mover = manager.create_index();
    manager.add_component(mover, Input { key: 4.0 });
    manager.add_component(mover, Circle { radius: 1.5 });

    manager.refresh();
    println!("After refresh");
    println!("{}", manager.state_dump());

    manager.for_each_matching(life, |entity, slot| {
        println!(
            "entity {} has {:.1} health",
            entity.position(),
            slot.get::<Health>().value
        );
    });

    manager.for_each_matching(velocity, |entity, slot| {
        let key = slot.get::<Input>().key;
        slot.get_mut::<Circle>().radius += key;
        println!(
            "entity {} grew to radius {:.1}",
            entity.position(),
            slot.get::<Circle>().radius
        );
    });

    manager.clear();
    println!("After clear");
    println!("{}", manager.state_dump());

    Ok(())
}
