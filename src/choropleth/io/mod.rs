mod geojson;
mod svg;
