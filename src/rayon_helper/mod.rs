/// Choose between iter and par_iter
#[cfg(not(feature = "parallel"))]
#[macro_export]
macro_rules! iter {
    ($e:expr) => {
        $e.iter()
    };
}

/// Choose between iter and par_iter
#[cfg(feature = "parallel")]
#[macro_export]
macro_rules! iter {
    ($e:expr) => {
        $e.par_iter()
    };
}

/// Choose between find_map and find_map_first, both return the first hit in iteration order.
#[cfg(not(feature = "parallel"))]
#[macro_export]
macro_rules! find_map_first {
    ($e:expr, $f:expr) => {
        $e.iter().find_map($f)
    };
}

/// Choose between find_map and find_map_first, both return the first hit in iteration order.
#[cfg(feature = "parallel")]
#[macro_export]
macro_rules! find_map_first {
    ($e:expr, $f:expr) => {
        $e.par_iter().find_map_first($f)
    };
}
