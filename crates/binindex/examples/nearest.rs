//! Minimal binning example: insert a few points, then query them.

use std::error::Error;

use binindex::Bins2;

fn main() -> Result<(), Box<dyn Error>> {
    // 10x10 box cut into 5 divisions per axis (2x2 cells)
    let mut bins = Bins2::new([0.0, 0.0], [10.0, 10.0], 5)?;
    bins.insert([1.0, 1.0], 1)?;
    bins.insert([9.0, 9.0], 2)?;
    bins.insert([4.5, 5.5], 3)?;

    println!(
        "{} entries in {} of {} bins",
        bins.len(),
        bins.occupied().count(),
        bins.spec().bin_count()
    );

    let near = bins.find_nearest([0.5, 0.5])?;
    println!("Nearest to (0.5, 0.5): {near:?}");

    let along = bins.find_along_segment([0.0, 0.0], [10.0, 10.0], 1.0);
    println!("Within 1.0 of the diagonal: {along:?}");

    println!("{bins}");
    Ok(())
}
