use itertools::Itertools;
use dickson::rings::Fp;
use dickson::sequence::{dickson_poly, value_set};

// Prints D_n(1, x) mod p and the values it takes.
fn main() {
    let mut args = std::env::args();
    let Some((_, p, n)) = args.next_tuple() else {
        println!("Arguments: <p> <n>");
        return;
    };

    let Ok(n) = n.parse() else {
        println!("Invalid index: {n}.");
        return;
    };

    let r = match p.parse().map(Fp::new) {
        Ok(Ok(r)) => r,
        Ok(Err(e)) => return println!("{e}."),
        Err(_) => return println!("Invalid prime: {p}."),
    };

    let vs = value_set(n, &r);
    println!("D_{n}(1, x) = {}", dickson_poly(n, &r));
    println!("values: {{{}}}", vs.values().iter().join(", "));
    if vs.is_permutation() {
        println!("This is a permutation polynomial.");
    }
}
