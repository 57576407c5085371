mod controls;
mod legend;
mod panels;
mod records;
