//! some utilities


use num_traits::float::Float;

use ndarray::{Array2, Axis};
use sprs::{CsMat};


/// do a L1 row normalization of Csr Mat, to get a transition matrix from an adjacency (or count) matrix.
/// Rows with null sum are left untouched. Returns the number of such rows.
pub fn csr_row_normalization<F>(csr_mat : &mut CsMat<F>) -> usize
    where F : Float {
    //
    assert!(csr_mat.is_csr());
    //
    let (nb_row, _ ) = csr_mat.shape();
    let mut range_i : std::ops::Range<usize>;
    let mut nb_null_row = 0usize;
    for i in 0..nb_row {
        let mut sum_i : F;
        {  // the borrow checker do not let us access csr_mat.indptr() and csr_mat.data_mut() simultaneously
            range_i = csr_mat.indptr().outer_inds_sz(i);
            sum_i = F::zero();
            let data = csr_mat.data();
            for j in range_i.clone() {
                sum_i = sum_i + data[j];
            }
        }
        if !(sum_i > F::zero()) {
            log::trace!("csr_row_normalization null sum of row i {}", i);
            nb_null_row += 1;
        } else {
            let data = csr_mat.data_mut();
            for j in range_i {
                data[j] = data[j]/sum_i;
            }
        }
    } // end of for i
    log::debug!("csr_row_normalization nb row with null sum : {}", nb_null_row);
    nb_null_row
} // end of csr_row_normalization


/// do a L2 row normalization of a dense matrix. Rows with null norm are left untouched.
/// Returns the number of such rows.
pub fn dense_row_l2_normalization<F>(mat : &mut Array2<F>) -> usize
    where F : Float {
    //
    let mut nb_null_row = 0usize;
    for (i, mut row) in mat.axis_iter_mut(Axis(0)).enumerate() {
        let norm_i = row.iter().fold(F::zero(), |acc, x| acc + *x * *x).sqrt();
        if norm_i > F::zero() {
            row.mapv_inplace(|x| x/norm_i);
        }
        else {
            nb_null_row += 1;
            log::trace!("dense_row_l2_normalization null norm of row i {}", i);
        }
    }
    log::debug!("dense_row_l2_normalization nb row with null norm : {}", nb_null_row);
    nb_null_row
}  // end of dense_row_l2_normalization


//===============================================================


#[cfg(test)]
mod tests {

    use super::*;

    use sprs::{CsMat, TriMatBase};

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }


    fn get_wiki_csr_mat_f64() -> CsMat<f64> {
        //
        // let mat =  ndarray::arr2( &
        //   [[ 1. , 0. , 0. , 0., 2. ],  // row 0
        //   [ 0. , 0. , 3. , 0. , 0. ],  // row 1
        //   [ 0. , 0. , 0. , 0. , 0. ],  // row 2
        //   [ 0. , 2. , 0. , 4. , 0. ]]  // row 3
        // );
        let rows = vec![0, 0, 1, 3, 3];
        let cols = vec![0, 4, 2, 1, 3];
        let values = vec![1., 2., 3., 2., 4.];
        //
        let trimat = TriMatBase::<Vec<usize>, Vec<f64>>::from_triplets((4,5),rows, cols, values);
        let csr_mat : CsMat<f64> = trimat.to_csr();
        csr_mat
    }  // end of get_wiki_csr_mat_f64



    #[test]
    fn test_csr_row_normalization() {
        //
        log_init_test();
        //
        let mut csr_mat = get_wiki_csr_mat_f64();
        let nb_null = csr_row_normalization(&mut csr_mat);
        assert_eq!(nb_null, 1);
        //
        let dense = csr_mat.to_dense();
        let check = (dense[[0,0]]- 1./3.).abs();
        log::debug!("check (0,0): {}", check);
        assert!( check < 1.0E-10);
        //
        let check = (dense[[0,4]]- 2./3.).abs();
        log::debug!("check (0,4): {}", check);
        assert!( check < 1.0E-10);
        //
        let check = (dense[[3,1]]- 1./3.).abs();
        log::debug!("check (3,1): {}", check);
        assert!( check < 1.0E-10);
        // null row stays null, no nan
        assert!(dense.row(2).iter().all(|x| *x == 0.));
        for i in [0usize, 1, 3] {
            assert!((dense.row(i).sum() - 1.).abs() < 1.0E-10);
        }
   } // end of test_csr_row_normalization


   #[test]
    fn test_dense_l2_normalization() {
        //
        log_init_test();
        //
        let mut dense =  ndarray::arr2( &
          [[ 3. , 0. , 4. ],  // row 0
          [ 0. , 0. , 0. ],  // row 1
          [ -1. , 1. , 1. ]]  // row 2
        );
        let nb_null = dense_row_l2_normalization(&mut dense);
        assert_eq!(nb_null, 1);
        assert!((dense[[0,0]] - 0.6).abs() < 1.0E-10);
        assert!((dense[[0,2]] - 0.8).abs() < 1.0E-10);
        assert!(dense.row(1).iter().all(|x| *x == 0.));
        let norm2 = dense.row(2).dot(&dense.row(2));
        assert!((norm2 - 1.).abs() < 1.0E-10);
        assert!((dense[[2,0]] + 1./3f64.sqrt()).abs() < 1.0E-10);
    } // end of test_dense_l2_normalization


}   // end of mod tests
