use matrixcore::ops::{divide, multiply};
use matrixcore::{Matrix, Selector};
use rand::Rng;

fn main() -> matrixcore::Result<()> {
    env_logger::init();

    let n = 4;
    let mut rng = rand::thread_rng();
    let mut a = Matrix::dense(n, n)?;
    for i in 0..n {
        for j in 0..n {
            a.set(i, j, rng.gen_range(-1.0..1.0))?;
        }
        // keep it comfortably nonsingular
        a.set(i, i, a.get(i, i)? + n as f64)?;
    }
    a.set_name(Some("a".into()));
    a.set_row_name(0, "top")?;
    a.set_column_name(n - 1, "right edge")?;
    println!("{a}");

    let x = Matrix::dense_from_rows(&[[1.0, 2.0, 3.0, 4.0]])?;
    let b = multiply(&x, &a)?;
    let solved = divide(&b, &a)?;
    println!("x recovered from x*a / a:\n{solved}");

    println!("structure of the identity: {:?}", Matrix::identity(n)?.structure());

    let mut view = a.view([0, 2], Selector::All)?;
    view.set(1, 0, 0.0)?;
    println!("a[2,0] after writing through a view: {}", a.get(2, 0)?);
    a.dispose();
    println!("view after its source was disposed (is_view = {}):\n{view}", view.is_view());

    let bytes = view.to_bytes()?;
    println!("serialized view: {} bytes, equal after decoding: {}", bytes.len(), Matrix::from_bytes(&bytes)? == view);
    Ok(())
}
