//! End-to-end scenarios over the JSON port.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::codec::{Field, Marshal, ReadContext, WriteContext};
use crate::error::{ErrorKind, MarshalError, RegistryError};
use crate::poly::{Class, Polymorphic};
use crate::registry::{ClassId, ClassRegistry, EnumRegistry, WireEnum};

// -----------------------------------------------------------------------------
// Types

crate::wire_enum! {
    enum Faction {
        Neutral = 0,
        Horde = 1,
        Alliance = 2,
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
struct Player {
    id: u32,
    version: String,
    gold: u64,
}

impl Marshal for Player {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
        ctx.scalar("id", &self.id)?;
        ctx.scalar("version", &self.version)?;
        ctx.scalar("gold", &self.gold)
    }

    fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
        ctx.scalar("id", &mut self.id)?;
        ctx.scalar("version", &mut self.version)?;
        ctx.scalar("gold", &mut self.gold)
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
struct Building {
    name: String,
}

impl Marshal for Building {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
        ctx.scalar("name", &self.name)
    }

    fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
        ctx.scalar("name", &mut self.name)
    }
}

impl Class for Building {
    const CLASS_ID: ClassId = ClassId::new(100);
}

#[derive(Default, Clone, Debug, PartialEq)]
struct Tower {
    building: Building,
    floors: u16,
}

impl Marshal for Tower {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
        ctx.base(&self.building)?;
        ctx.scalar("floors", &self.floors)
    }

    fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
        ctx.base(&mut self.building)?;
        ctx.scalar("floors", &mut self.floors)
    }
}

impl Class for Tower {
    const CLASS_ID: ClassId = ClassId::new(101);
}

crate::auto_register_class!(Building, Tower);
crate::auto_register_enum!(Faction);

/// A second version of `Player` with one field appended.
#[derive(Default, Clone, Debug, PartialEq)]
struct PlayerV2 {
    player: Player,
    faction: Faction,
}

impl Marshal for PlayerV2 {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
        ctx.base(&self.player)?;
        ctx.enumeration("faction", self.faction)
    }

    fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
        ctx.base(&mut self.player)?;
        ctx.enumeration("faction", &mut self.faction)
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
struct City {
    mayor: Player,
    allies: Vec<Faction>,
    capital: Option<Box<dyn Polymorphic>>,
    buildings: Vec<Box<dyn Polymorphic>>,
    citizens: Vec<Player>,
    flags: Vec<bool>,
    rating: f32,
}

impl Marshal for City {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
        ctx.object("mayor", &self.mayor)?;
        ctx.enumerations("allies", &self.allies)?;
        ctx.polymorphic("capital", self.capital.as_deref())?;
        ctx.polymorphics("buildings", &self.buildings)?;
        ctx.objects("citizens", &self.citizens)?;
        ctx.scalars("flags", &self.flags)?;
        ctx.scalar("rating", &self.rating)
    }

    fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
        ctx.object("mayor", &mut self.mayor)?;
        ctx.enumerations("allies", &mut self.allies)?;
        ctx.polymorphic("capital", &mut self.capital)?;
        ctx.polymorphics("buildings", &mut self.buildings)?;
        ctx.objects("citizens", &mut self.citizens)?;
        ctx.scalars("flags", &mut self.flags)?;
        ctx.scalar("rating", &mut self.rating)
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
struct Ticket {
    serial: u32,
    owner: String,
}

impl Marshal for Ticket {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
        ctx.scalar(Field::required("serial"), &self.serial)?;
        ctx.scalar("owner", &self.owner)
    }

    fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
        ctx.scalar(Field::required("serial"), &mut self.serial)?;
        ctx.scalar("owner", &mut self.owner)
    }
}

fn classes() -> ClassRegistry {
    let mut classes = ClassRegistry::new();
    classes.register::<Building>().unwrap();
    classes.register::<Tower>().unwrap();
    classes
}

fn city() -> City {
    City {
        mayor: Player {
            id: 7,
            version: "v3".into(),
            gold: 1 << 40,
        },
        allies: vec![Faction::Alliance, Faction::Neutral],
        capital: Some(Box::new(Tower {
            building: Building {
                name: "Spire".into(),
            },
            floors: 12,
        })),
        buildings: vec![
            Box::new(Building {
                name: "Hut".into(),
            }),
            Box::new(Tower {
                building: Building {
                    name: "Keep".into(),
                },
                floors: 5,
            }),
        ],
        citizens: vec![
            Player {
                id: 1,
                version: "Mike".into(),
                gold: 5,
            },
            Player::default(),
        ],
        flags: vec![true, false],
        rating: 0.25,
    }
}

// -----------------------------------------------------------------------------
// Scenarios

#[test]
fn player_keyed() {
    let player = Player {
        id: 10,
        version: "v1".into(),
        gold: 255,
    };
    let bytes = crate::to_bytes(&player, true).unwrap();
    assert_eq!(bytes, br#"{"id":10,"version":"v1","gold":255}"#);

    let back: Player = crate::from_bytes(&bytes).unwrap();
    assert_eq!(back.id, 10);
    assert_eq!(back.version, "v1");
    assert_eq!(back.gold, 255);
}

#[test]
fn player_positional() {
    let player = Player {
        id: 1,
        version: "Mike".into(),
        gold: 5,
    };
    let bytes = crate::to_bytes(&player, false).unwrap();
    assert_eq!(bytes, br#"[1,"Mike",5]"#);
    assert_eq!(crate::from_bytes::<Player>(&bytes).unwrap(), player);
}

#[test]
fn derived_fields_follow_base_fields() {
    let tower = Tower {
        building: Building {
            name: "Keep".into(),
        },
        floors: 5,
    };
    assert_eq!(crate::to_bytes(&tower, false).unwrap(), br#"["Keep",5]"#);
    assert_eq!(
        crate::to_bytes(&tower, true).unwrap(),
        br#"{"name":"Keep","floors":5}"#
    );
}

#[test]
fn city_round_trip() {
    let classes = classes();
    for associative in [true, false] {
        let bytes = crate::to_bytes(&city(), associative).unwrap();
        let back: City = crate::from_bytes_in(&bytes, &classes).unwrap();
        assert_eq!(back, city());
    }
}

#[test]
fn zero_values_round_trip() {
    let classes = classes();
    for associative in [true, false] {
        let bytes = crate::to_bytes(&City::default(), associative).unwrap();
        let back: City = crate::from_bytes_in(&bytes, &classes).unwrap();
        assert_eq!(back, City::default());
    }
    // Defaults are written, not skipped.
    assert_eq!(
        crate::to_bytes(&Player::default(), true).unwrap(),
        br#"{"id":0,"version":"","gold":0}"#
    );
}

#[test]
fn polymorphic_fidelity() {
    let bytes = crate::to_bytes(&city(), false).unwrap();
    let back: City = crate::from_bytes_in(&bytes, &classes()).unwrap();

    let ids: Vec<ClassId> = back.buildings.iter().map(|b| b.class_id()).collect();
    assert_eq!(ids, [Building::CLASS_ID, Tower::CLASS_ID]);
    assert_eq!(back.buildings[1].downcast_ref::<Tower>().unwrap().floors, 5);
}

#[test]
fn keyed_forward_and_backward_compatibility() {
    let newer = PlayerV2 {
        player: Player {
            id: 3,
            version: "v2".into(),
            gold: 9,
        },
        faction: Faction::Horde,
    };

    // An old reader skips the added field.
    let bytes = crate::to_bytes(&newer, true).unwrap();
    assert_eq!(bytes, br#"{"id":3,"version":"v2","gold":9,"faction":1}"#);
    assert_eq!(crate::from_bytes::<Player>(&bytes).unwrap(), newer.player);

    // A new reader defaults what an old writer did not know about.
    let bytes = br#"{"id":3,"gold":9}"#;
    let back: PlayerV2 = crate::from_bytes(bytes).unwrap();
    assert_eq!(back.player.version, "");
    assert_eq!(back.faction, Faction::Neutral);
}

#[test]
fn positional_schema_evolution() {
    let back: PlayerV2 = crate::from_bytes(br#"[1,"Mike",5]"#).unwrap();
    assert_eq!(back.faction, Faction::Neutral);
    assert_eq!(back.player.gold, 5);

    let back: Player = crate::from_bytes(br#"[1,"Mike",5,2]"#).unwrap();
    assert_eq!(back.gold, 5);

    let err = crate::from_bytes::<Ticket>(b"[]").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ShortArray { needed: 1, found: 0 });
    assert_eq!(err.path(), "serial");

    let ticket: Ticket = crate::from_bytes(b"[4]").unwrap();
    assert_eq!(ticket.serial, 4);
}

#[test]
fn enums() {
    for faction in [Faction::Neutral, Faction::Horde, Faction::Alliance] {
        assert_eq!(Faction::by_name(faction.name()), Ok(faction));
    }
    assert!(matches!(
        Faction::by_name("Pirates"),
        Err(ErrorKind::UnknownEnumName { enum_name: "Faction", .. })
    ));

    let err = crate::from_bytes::<PlayerV2>(br#"{"faction":9}"#).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::UnknownEnumCode {
            enum_name: "Faction",
            code: 9
        }
    );
    assert_eq!(err.path(), "faction");
}

#[test]
fn errors_point_at_the_field() {
    let err = crate::from_bytes_in::<City>(
        br#"{"citizens":[{"id":1},{"id":"two"}]}"#,
        &classes(),
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { expected: "u32", .. }));
    assert_eq!(err.path(), "citizens[1].id");

    let err = crate::from_bytes_in::<City>(br#"{"buildings":[[100,"a"],[55]]}"#, &classes())
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownClass(ClassId::new(55)));
    assert_eq!(err.path(), "buildings[1]");

    let err = crate::from_bytes::<Player>(br#""player""#).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { expected: "object", .. }));
}

#[test]
fn auto_register() {
    let mut registry = ClassRegistry::new();
    let supported = registry.auto_register().unwrap();
    assert_eq!(supported, cfg!(feature = "auto_register"));
    if supported {
        assert!(registry.contains(Building::CLASS_ID));
        assert!(registry.contains(Tower::CLASS_ID));
        // Repeated calls insert nothing new.
        assert_eq!(registry.auto_register(), Ok(true));
    }

    let mut enums = EnumRegistry::new();
    assert_eq!(enums.auto_register(), Ok(supported));
    if supported {
        assert!(enums.contains("Faction"));
        assert_eq!(enums.code_of("Faction", "Horde"), Ok(1));
        assert_eq!(enums.get("Faction"), Some(Faction::info()));
        assert_eq!(enums.auto_register(), Ok(true));
    } else {
        assert!(enums.is_empty());
    }
}

#[test]
fn non_finite_floats_fail_to_encode() {
    for associative in [true, false] {
        let mut value = city();
        value.rating = f32::INFINITY;
        let err = crate::to_bytes(&value, associative).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { expected: "finite float", .. }));
        assert_eq!(err.path(), "rating");
    }

    let mut value = city();
    value.rating = f32::NAN;
    assert!(crate::to_bytes(&value, true).is_err());
}

// The only test touching the process-wide registries.
#[test]
fn global_init_barrier() {
    let registries = crate::registry::init(|r| {
        r.classes.register::<Building>()?;
        r.classes.register::<Tower>()?;
        r.enums.register::<Faction>()?;
        Ok(())
    })
    .unwrap();
    assert!(registries.classes.contains(Tower::CLASS_ID));
    assert_eq!(registries.enums.code_of("Faction", "Alliance"), Ok(2));

    let again = crate::registry::init(|_| Ok(()));
    assert_eq!(again.err(), Some(RegistryError::AlreadyInitialized));

    let bytes = crate::to_bytes(&city(), true).unwrap();
    let back: City = crate::from_bytes(&bytes).unwrap();
    assert_eq!(back, city());
}
