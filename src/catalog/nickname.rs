use crate::foundation::math::stable_hash64;

const ADJECTIVES: &[&str] = &[
    "Happy", "Angry", "Chill", "Sleepy", "Hungry", "Brave", "Clever", "Wild", "Sneaky", "Fluffy",
    "Grumpy", "Jolly", "Lazy", "Mighty", "Noble", "Proud", "Quick", "Radiant", "Sassy", "Spicy",
    "Cosmic", "Electric", "Mystic", "Neon", "Turbo", "Ultra", "Atomic", "Blazing", "Frozen",
    "Golden", "Crystal", "Shadow", "Thunder", "Pixel", "Cyber", "Retro", "Funky", "Groovy", "Epic",
    "Legendary", "Dancing", "Flying", "Running", "Jumping", "Swimming", "Glowing", "Sparkling",
];

const ANIMALS: &[&str] = &[
    "Panda", "Koala", "Penguin", "Rabbit", "Tiger", "Dragon", "Phoenix", "Wolf", "Fox", "Bear",
    "Owl", "Eagle", "Dolphin", "Shark", "Lion", "Leopard", "Monkey", "Gorilla", "Elephant",
    "Giraffe", "Zebra", "Hippo", "Rhino", "Croc", "Turtle", "Frog", "Gecko", "Chameleon",
    "Unicorn", "Griffin", "Yeti", "Kraken", "Otter", "Seal", "Walrus", "Flamingo", "Parrot",
    "Toucan", "Sloth", "Raccoon", "Hedgehog", "Squirrel", "Badger", "Beaver", "Moose", "Deer",
    "Llama", "Alpaca",
];

/// "Adjective Animal" display name derived from a stable hash of `user_id`.
///
/// The same id always yields the same name, across processes and restarts.
pub fn nickname_for(user_id: &str) -> String {
    let h = stable_hash64(user_id.as_bytes());
    let adjectives = ADJECTIVES.len() as u64;
    let adj = ADJECTIVES[(h % adjectives) as usize];
    let animal = ANIMALS[((h / adjectives) % ANIMALS.len() as u64) as usize];
    format!("{adj} {animal}")
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/nickname.rs"]
mod tests;
