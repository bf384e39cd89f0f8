pub mod profile_strength;
