use ctrie::Trie;

#[derive(Debug, Default)]
pub enum Value {
    #[default]
    A,
    B,
    C,
    D,
}

pub fn main() {
    let mut tree = Trie::<Value>::new();
    tree.replace("hello", Value::A);
    tree.replace("world", Value::B);
    tree.replace("cool", Value::C);
    *tree.insert("he", true) = Value::D;

    println!("Hello: {:?}", tree.find("hello").unwrap());
    println!("Help (via wildcard): {:?}", tree.find("help").unwrap());
    println!("{tree:?}");
    print!("{}", tree.dump());
}
