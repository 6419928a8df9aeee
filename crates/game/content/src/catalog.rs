//! Stock equipment and unit catalog.
//!
//! The built-in stat blocks the engine ships with. Hosts can extend or
//! replace entries, or load a whole catalog from RON files through
//! [`crate::loaders::CatalogLoader`].

use std::collections::HashMap;

use tactics_core::{
    AbilityFlags, Armor, CatalogOracle, Explosive, Faction, RangeMetric, StatusEffectKind,
    StatusProc, UnitStats, UnitTemplate, Weapon, WeaponClass,
};

/// In-memory catalog implementing [`CatalogOracle`].
///
/// Entries are keyed by catalog id and treated as immutable once
/// registered.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    weapons: HashMap<String, Weapon>,
    armor: HashMap<String, Armor>,
    explosives: HashMap<String, Explosive>,
    units: HashMap<String, UnitTemplate>,
}

impl Catalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock catalog: the weapons, armor, explosives, and unit
    /// templates used by the shipped missions and the test harness.
    pub fn stock() -> Self {
        let mut catalog = Self::empty();

        // ====================================================================
        // Weapons
        // ====================================================================
        catalog.add_weapon(Weapon {
            name: "assault_rifle".into(),
            class: WeaponClass::Primary,
            damage: 4,
            accuracy: 75,
            range: 10,
            range_metric: RangeMetric::Manhattan,
            ammo_capacity: 4,
            crit_bonus: 0,
            on_hit: Default::default(),
        });
        catalog.add_weapon(Weapon {
            name: "shotgun".into(),
            class: WeaponClass::Primary,
            damage: 6,
            accuracy: 70,
            range: 6,
            range_metric: RangeMetric::Manhattan,
            ammo_capacity: 3,
            crit_bonus: 10,
            on_hit: Default::default(),
        });
        catalog.add_weapon(Weapon {
            name: "sniper_rifle".into(),
            class: WeaponClass::Primary,
            damage: 6,
            accuracy: 80,
            range: 20,
            range_metric: RangeMetric::Euclidean,
            ammo_capacity: 3,
            crit_bonus: 15,
            on_hit: Default::default(),
        });
        catalog.add_weapon(Weapon {
            name: "pistol".into(),
            class: WeaponClass::Secondary,
            damage: 2,
            accuracy: 75,
            range: 8,
            range_metric: RangeMetric::Manhattan,
            ammo_capacity: 12,
            crit_bonus: 0,
            on_hit: Default::default(),
        });
        catalog.add_weapon(
            Weapon {
                name: "sword".into(),
                class: WeaponClass::Blade,
                damage: 5,
                accuracy: 85,
                range: 1,
                range_metric: RangeMetric::Manhattan,
                ammo_capacity: 0,
                crit_bonus: 10,
                on_hit: Default::default(),
            }
            .with_proc(StatusProc {
                kind: StatusEffectKind::Bleeding,
                chance: 15,
                duration: 2,
                intensity: 2,
            }),
        );
        catalog.add_weapon(Weapon {
            name: "plasma_rifle".into(),
            class: WeaponClass::Primary,
            damage: 5,
            accuracy: 70,
            range: 11,
            range_metric: RangeMetric::Manhattan,
            ammo_capacity: 4,
            crit_bonus: 5,
            on_hit: Default::default(),
        });

        // ====================================================================
        // Armor
        // ====================================================================
        catalog.add_armor(Armor {
            name: "kevlar".into(),
            damage_reduction: 1,
            aim_penalty: 0,
        });
        catalog.add_armor(Armor {
            name: "predator_plate".into(),
            damage_reduction: 2,
            aim_penalty: 0,
        });
        catalog.add_armor(Armor {
            name: "warden_plate".into(),
            damage_reduction: 3,
            aim_penalty: 5,
        });
        catalog.add_armor(Armor {
            name: "carapace".into(),
            damage_reduction: 2,
            aim_penalty: 0,
        });

        // ====================================================================
        // Explosives
        // ====================================================================
        catalog.add_explosive(Explosive {
            name: "frag_grenade".into(),
            damage: 25,
            radius: 3,
            floor_factor: 30,
            chain_chance: 20,
        });
        catalog.add_explosive(Explosive {
            name: "plasma_grenade".into(),
            damage: 30,
            radius: 3,
            floor_factor: 30,
            chain_chance: 25,
        });
        catalog.add_explosive(Explosive {
            name: "fuel_barrel".into(),
            damage: 15,
            radius: 2,
            floor_factor: 50,
            chain_chance: 60,
        });

        // ====================================================================
        // Unit templates
        // ====================================================================
        catalog.add_unit(
            UnitTemplate::builder("rookie")
                .max_health(10)
                .stats(UnitStats {
                    aim: 65,
                    initiative: 12,
                    ..UnitStats::default()
                })
                .weapon("assault_rifle")
                .armor("kevlar")
                .concealed(true)
                .build(),
        );
        catalog.add_unit(
            UnitTemplate::builder("ranger")
                .max_health(12)
                .stats(UnitStats {
                    aim: 70,
                    base_damage: 5,
                    mobility: 10,
                    initiative: 14,
                    ..UnitStats::default()
                })
                .abilities(AbilityFlags::BLADESTORM)
                .weapon("shotgun")
                .armor("predator_plate")
                .concealed(true)
                .build(),
        );
        catalog.add_unit(
            UnitTemplate::builder("sharpshooter")
                .max_health(8)
                .stats(UnitStats {
                    aim: 78,
                    crit_chance: 20,
                    view_range: 16,
                    initiative: 10,
                    ..UnitStats::default()
                })
                .abilities(AbilityFlags::SQUAD_SIGHT)
                .weapon("sniper_rifle")
                .armor("kevlar")
                .concealed(true)
                .build(),
        );
        catalog.add_unit(
            UnitTemplate::builder("vip")
                .max_health(6)
                .stats(UnitStats {
                    aim: 40,
                    mobility: 8,
                    initiative: 5,
                    ..UnitStats::default()
                })
                .abilities(AbilityFlags::VIP)
                .build(),
        );
        catalog.add_unit(
            UnitTemplate::builder("sectoid")
                .faction(Faction::Alien)
                .max_health(8)
                .stats(UnitStats {
                    aim: 60,
                    initiative: 11,
                    ..UnitStats::default()
                })
                .weapon("plasma_rifle")
                .build(),
        );
        catalog.add_unit(
            UnitTemplate::builder("muton")
                .faction(Faction::Alien)
                .max_health(14)
                .stats(UnitStats {
                    aim: 65,
                    base_damage: 5,
                    initiative: 13,
                    ..UnitStats::default()
                })
                .weapon("plasma_rifle")
                .armor("carapace")
                .build(),
        );
        catalog.add_unit(
            UnitTemplate::builder("archon_ruler")
                .faction(Faction::Ruler)
                .max_health(30)
                .stats(UnitStats {
                    aim: 70,
                    base_damage: 7,
                    mobility: 12,
                    initiative: 18,
                    ..UnitStats::default()
                })
                .weapon("plasma_rifle")
                .armor("warden_plate")
                .build(),
        );
        catalog.add_unit(
            UnitTemplate::builder("chosen_assassin")
                .faction(Faction::Chosen)
                .max_health(24)
                .stats(UnitStats {
                    aim: 75,
                    base_damage: 6,
                    mobility: 12,
                    crit_chance: 20,
                    initiative: 16,
                    ..UnitStats::default()
                })
                .abilities(AbilityFlags::BLADESTORM)
                .weapon("sword")
                .build(),
        );

        catalog
    }

    pub fn add_weapon(&mut self, weapon: Weapon) {
        self.weapons.insert(weapon.name.clone(), weapon);
    }

    pub fn add_armor(&mut self, armor: Armor) {
        self.armor.insert(armor.name.clone(), armor);
    }

    pub fn add_explosive(&mut self, explosive: Explosive) {
        self.explosives.insert(explosive.name.clone(), explosive);
    }

    pub fn add_unit(&mut self, template: UnitTemplate) {
        self.units.insert(template.name.clone(), template);
    }

    pub fn weapon_keys(&self) -> impl Iterator<Item = &str> {
        self.weapons.keys().map(String::as_str)
    }
}

impl CatalogOracle for Catalog {
    fn weapon(&self, key: &str) -> Option<Weapon> {
        self.weapons.get(key).cloned()
    }

    fn armor(&self, key: &str) -> Option<Armor> {
        self.armor.get(key).cloned()
    }

    fn explosive(&self, key: &str) -> Option<Explosive> {
        self.explosives.get(key).cloned()
    }

    fn unit_template(&self, key: &str) -> Option<UnitTemplate> {
        self.units.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_catalog_resolves_template_equipment() {
        let catalog = Catalog::stock();

        for key in ["rookie", "ranger", "sharpshooter", "sectoid", "muton"] {
            let template = catalog.unit_template(key).expect(key);
            if let Some(weapon_key) = &template.weapon {
                assert!(catalog.weapon(weapon_key).is_some(), "weapon {weapon_key}");
            }
            if let Some(armor_key) = &template.armor {
                assert!(catalog.armor(armor_key).is_some(), "armor {armor_key}");
            }
        }
    }

    #[test]
    fn blades_need_no_ammo() {
        let catalog = Catalog::stock();
        let sword = catalog.weapon("sword").unwrap();
        assert!(!sword.is_ranged());
        assert_eq!(sword.ammo_capacity, 0);
    }

    #[test]
    fn soldiers_start_concealed_enemies_do_not() {
        let catalog = Catalog::stock();
        assert!(catalog.unit_template("rookie").unwrap().concealed);
        assert!(!catalog.unit_template("sectoid").unwrap().concealed);
    }
}
