mod interpolator;
mod spline;
