//! Skill catalog, grouped into the sections of the skill wheel.

use std::collections::HashMap;

use buildman_types::build::SkillId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRecord {
    pub id: SkillId,
    pub name: &'static str,
    /// Basic/advanced/expert tier of a section.
    pub main: bool,
}

#[derive(Debug, Clone)]
pub struct SkillSection {
    pub id: &'static str,
    pub name: &'static str,
    pub skills: Vec<SkillRecord>,
}

type SectionDef = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

// The first three skills of every section except "special" are main skills.
const SECTIONS: &[SectionDef] = &[
    ("attack", "Нападение", &[
        ("attack1", "Основы нападения"),
        ("attack2", "Развитое нападение"),
        ("attack3", "Искусное нападение"),
        ("battle_frenzy", "Боевое безумие"),
        ("retribution", "Воздаяние"),
        ("nature_wrath", "Лесная ярость"),
        ("power_of_speed", "Мастерство скорости"),
        ("excruciating_strike", "Мощный удар"),
        ("archery", "Стрельба"),
        ("tactics", "Тактика"),
        ("cold_steel", "Холодная сталь"),
    ]),
    ("defense", "Защита", &[
        ("defense1", "Основы защиты"),
        ("defense2", "Развитая защита"),
        ("defense3", "Искусная защита"),
        ("last_stand", "Битва до последнего"),
        ("stand_your_ground", "Глухая оборона"),
        ("preparation", "Готовность"),
        ("power_of_endurance", "Сила камня"),
        ("resistance", "Сопротивление"),
        ("protection", "Сопротивление магии"),
        ("vitality", "Стойкость"),
        ("evasion", "Уклонение"),
    ]),
    ("luck", "Удача", &[
        ("luck1", "Призрачная удача"),
        ("luck2", "Большая удача"),
        ("luck3", "Постоянная удача"),
        ("magic_resistance", "Магическое сопротивление"),
        ("piercing_luck", "Пронзающая удача"),
        ("soldier_luck", "Солдатская удача"),
        ("warlock_luck", "Удачливый чародей"),
        ("swarming_gate", "Широкие врата ада"),
        ("elven_luck", "Эльфийская удача"),
    ]),
    ("leadership", "Лидерство", &[
        ("leadership1", "Основы лидерства"),
        ("leadership2", "Развитое лидерство"),
        ("leadership3", "Искусное лидерство"),
        ("aura_of_swiftness", "Аура скорости"),
        ("divine_guidance", "Воодушевление"),
        ("battle_commander", "Лесной лидер"),
        ("recruitment", "Сбор войск"),
        ("empathy", "Сопереживание"),
    ]),
    ("enlightenment", "Образование", &[
        ("enlightenment1", "Начальное образование"),
        ("enlightenment2", "Среднее образование"),
        ("enlightenment3", "Высшее образование"),
        ("graduate", "Выпускник"),
        ("wizard_reward", "Колдовская награда"),
        ("know_your_enemy", "Лесное коварство"),
        ("lord_of_the_undead", "Повелитель мёртвых"),
        ("intelligence", "Притяжение маны"),
        ("dark_revelation", "Тёмное откровение"),
        ("arcane_exaltation", "Хранитель тайного"),
    ]),
    ("dark", "Магия Тьмы", &[
        ("dark1", "Основы магии Тьмы"),
        ("dark2", "Сильная магия Тьмы"),
        ("dark3", "Искусная магия Тьмы"),
        ("weakening_strike", "Ослабляющий удар"),
        ("fallen_knight", "Падший рыцарь"),
        ("master_of_pain", "Повелитель боли"),
        ("master_of_curses", "Повелитель проклятий"),
        ("master_of_mind", "Повелитель разума"),
    ]),
    ("destructive", "Магия Хаоса", &[
        ("destructive1", "Основы магии Хаоса"),
        ("destructive2", "Сильная магия Хаоса"),
        ("destructive3", "Искусная магия Хаоса"),
        ("searing_fires", "Иссушающее пламя"),
        ("sap_magic", "Истощение магии"),
        ("fiery_wrath", "Огненная ярость"),
        ("master_of_storms", "Повелитель бурь"),
        ("master_of_fire", "Повелитель огня"),
        ("master_of_ice", "Повелитель холода"),
        ("secrets_of_destruction", "Тайны хаоса"),
    ]),
    ("light", "Магия Света", &[
        ("light1", "Основы магии Света"),
        ("light2", "Сильная магия Света"),
        ("light3", "Искусная магия Света"),
        ("master_of_blessings", "Дарующий благословение"),
        ("master_of_abjuration", "Дарующий защиту"),
        ("fire_resistance", "Защита от огня"),
        ("master_of_wrath", "Повелитель ярости"),
        ("twilight", "Сумерки"),
        ("refined_mana", "Тайны света"),
    ]),
    ("summon", "Магия Природы", &[
        ("summon1", "Основы магии Природы"),
        ("summon2", "Сильная магия Природы"),
        ("summon3", "Искусная магия Природы"),
        ("master_of_conjuration", "Повелитель волшебства"),
        ("master_of_life", "Повелитель жизни"),
        ("master_of_obstacles", "Повелитель препятствий"),
    ]),
    ("sorcery", "Чародейство", &[
        ("sorcery1", "Основы чародейства"),
        ("sorcery2", "Развитое чародейство"),
        ("sorcery3", "Искусное чародейство"),
        ("mana_regeneration", "Восполнение маны"),
        ("boneward", "Защита от магии хаоса"),
        ("erratic_mana", "Изменчивая мана"),
        ("magic_insight", "Мудрость"),
        ("arcane_brillance", "Тайное откровение"),
        ("arcane_excellence", "Тайное преимущество"),
        ("arcane_training", "Тайные знания"),
    ]),
    ("special", "Фракция", &[
        ("hellfire", "Адское пламя"),
        ("magic_mirror", "Волшебное зеркало"),
        ("runeadv", "Дополнительные руны"),
        ("necr_soul", "Духовная связь"),
        ("zakarrow", "Заколдованная стрела"),
        ("nomagicdamage", "Контроль магии"),
        ("elf_shot", "Ливень из стрел"),
        ("benediction", "Молитва"),
        ("knight_mark", "Надзор"),
        ("memoryblood", "Память нашей Крови"),
        ("cre_master", "Повелитель существ"),
        ("consumecorpse", "Поглощение трупов"),
        ("barb_skill", "Пробивающая мощь"),
        ("powerraise", "Совершенное Поднятие мертвецов"),
        ("dark_blood", "Тёмная кровь"),
        ("dark_power", "Тёмная сила"),
        ("save_rage", "Упорство ярости"),
    ]),
];

#[derive(Debug, Clone)]
pub struct SkillCatalog {
    sections: Vec<SkillSection>,
    index: HashMap<SkillId, (usize, usize)>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        let sections: Vec<SkillSection> = SECTIONS
            .iter()
            .map(|&(id, name, skills)| SkillSection {
                id,
                name,
                skills: skills
                    .iter()
                    .enumerate()
                    .map(|(i, &(skill_id, skill_name))| SkillRecord {
                        id: SkillId::from(skill_id),
                        name: skill_name,
                        main: id != "special" && i < 3,
                    })
                    .collect(),
            })
            .collect();

        let mut index = HashMap::new();
        for (s, section) in sections.iter().enumerate() {
            for (k, skill) in section.skills.iter().enumerate() {
                index.insert(skill.id.clone(), (s, k));
            }
        }

        Self { sections, index }
    }

    pub fn sections(&self) -> &[SkillSection] {
        &self.sections
    }

    pub fn get(&self, id: &SkillId) -> Option<&SkillRecord> {
        self.index
            .get(id)
            .map(|&(s, k)| &self.sections[s].skills[k])
    }

    pub fn contains(&self, id: &SkillId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::new()
    }
}
