#[cfg(not(any(feature="intel-mkl-static", feature="openblas-static")))]
fn main() {
    // if not a static backend we need to specify we ask for lapacke
    println!("cargo:rustc-link-lib=lapacke");
}

#[cfg(any(feature="intel-mkl-static", feature="openblas-static"))]
fn main() {
}
