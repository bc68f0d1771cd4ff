
mod shapes;
