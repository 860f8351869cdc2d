use dickson::rings::Fp;
use dickson::sequence::Sweep;

// Lists the n < p^2 for which D_n(1, x) permutes F_p.
fn main() {
    let Some(p) = std::env::args().nth(1) else {
        println!("Arguments: <p>");
        return;
    };

    let r = match p.parse().map(Fp::new) {
        Ok(Ok(r)) => r,
        Ok(Err(e)) => return println!("{e}."),
        Err(_) => return println!("Invalid prime: {p}."),
    };

    let end = r.modulus() * r.modulus();
    let perms: Vec<u64> = Sweep::new(&r)
        .take_while(|vs| vs.n() < end)
        .filter(|vs| vs.is_permutation())
        .map(|vs| vs.n())
        .collect();

    println!("{} of {end} indices give permutations:", perms.len());
    println!("{perms:?}");
}
