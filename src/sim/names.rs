use crate::rng::SimRng;

const CULTURE_ONSETS: &[&str] = &[
    "Ash", "Bel", "Cor", "Dra", "Eld", "Fen", "Gal", "Hol", "Ish", "Jor",
    "Kal", "Lum", "Mar", "Nor", "Osk", "Pel", "Quar", "Rav", "Sol", "Tar",
    "Ul", "Vel", "Wyn", "Yor", "Zan",
];

const CULTURE_CODAS: &[&str] = &[
    "ari", "dori", "eni", "ghar", "iki", "mandi", "oni", "ovi", "rani",
    "shi", "tai", "umi", "vari", "wehi", "zuni",
];

const LEADER_PREFIXES: &[&str] = &[
    "Al", "Bor", "Cal", "Dar", "Er", "Fal", "Gor", "Hal", "Ith", "Kel",
    "Lor", "Mal", "Nar", "Or", "Ral", "Sel", "Tor", "Val", "Yar", "Zor",
];

const LEADER_SUFFIXES: &[&str] = &[
    "an", "ek", "ia", "im", "on", "ra", "ric", "ssa", "uin", "wen",
];

const CITY_PREFIXES: &[&str] = &[
    "Ald", "Bright", "Cold", "Deep", "East", "Fair", "Gold", "High",
    "Iron", "King", "Long", "Mill", "New", "Oak", "Raven", "Salt",
    "Stone", "Thorn", "West", "White",
];

const CITY_SUFFIXES: &[&str] = &[
    "burg", "dale", "ford", "gate", "haven", "hold", "mere", "mouth",
    "port", "stead", "vale", "watch",
];

// All draws go through SimRng's documented stream (one draw per table),
// so name generation is part of the stable trajectory like everything
// else.

/// Short culture name, stable across splits and civilization formation.
pub fn culture_name(rng: &mut SimRng) -> String {
    let onset = rng.choice(CULTURE_ONSETS);
    let coda = rng.choice(CULTURE_CODAS);
    format!("{onset}{coda}")
}

pub fn leader_name(rng: &mut SimRng) -> String {
    let prefix = rng.choice(LEADER_PREFIXES);
    let suffix = rng.choice(LEADER_SUFFIXES);
    format!("{prefix}{suffix}")
}

pub fn city_name(rng: &mut SimRng) -> String {
    let prefix = rng.choice(CITY_PREFIXES);
    let suffix = rng.choice(CITY_SUFFIXES);
    format!("{prefix}{suffix}")
}
