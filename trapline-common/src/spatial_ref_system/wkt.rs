/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

/// Returns the ESRI well-known text for the coordinate reference systems
/// the trapline tools read and write.
pub fn esri_wkt_from_epsg(epsg: u16) -> String {
    match epsg {
        2193 => "PROJCS[\"NZGD_2000_New_Zealand_Transverse_Mercator\",GEOGCS[\"GCS_NZGD_2000\",DATUM[\"D_NZGD_2000\",SPHEROID[\"GRS_1980\",6378137.0,298.257222101]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]],PROJECTION[\"Transverse_Mercator\"],PARAMETER[\"False_Easting\",1600000.0],PARAMETER[\"False_Northing\",10000000.0],PARAMETER[\"Central_Meridian\",173.0],PARAMETER[\"Scale_Factor\",0.9996],PARAMETER[\"Latitude_Of_Origin\",0.0],UNIT[\"Meter\",1.0]]".to_string(),
        4167 => "GEOGCS[\"GCS_NZGD_2000\",DATUM[\"D_NZGD_2000\",SPHEROID[\"GRS_1980\",6378137.0,298.257222101]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]".to_string(),
        4326 => "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]".to_string(),
        _ => "Unknown EPSG code".to_string(),
    }
}

fn leading_keyword(wkt: &str) -> String {
    wkt.trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_uppercase()
}

/// True for a geographic (latitude/longitude) coordinate system, in either
/// WKT1 or WKT2 form.
pub fn is_geographic_wkt(wkt: &str) -> bool {
    matches!(
        leading_keyword(wkt).as_str(),
        "GEOGCS" | "GEOGCRS" | "GEODCRS" | "GEOGRAPHICCRS"
    )
}

pub fn is_projected_wkt(wkt: &str) -> bool {
    matches!(
        leading_keyword(wkt).as_str(),
        "PROJCS" | "PROJCRS" | "PROJECTEDCRS"
    )
}

/// Recognises New Zealand Transverse Mercator, either by name or by its
/// projection parameters.
pub fn is_nztm_wkt(wkt: &str) -> bool {
    if !is_projected_wkt(wkt) {
        return false;
    }
    let s = wkt.to_uppercase().replace(' ', "_");
    if s.contains("NEW_ZEALAND_TRANSVERSE_MERCATOR") || s.contains("NZTM") {
        return true;
    }
    s.contains("TRANSVERSE_MERCATOR")
        && s.contains("CENTRAL_MERIDIAN\",173")
        && s.contains("FALSE_EASTING\",1600000")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wkt_classification() {
        let nztm = esri_wkt_from_epsg(2193);
        let wgs84 = esri_wkt_from_epsg(4326);
        assert!(is_projected_wkt(&nztm));
        assert!(is_nztm_wkt(&nztm));
        assert!(!is_geographic_wkt(&nztm));
        assert!(is_geographic_wkt(&wgs84));
        assert!(is_geographic_wkt(&esri_wkt_from_epsg(4167)));
        assert!(!is_nztm_wkt(&wgs84));
        assert!(is_geographic_wkt("  GEOGCRS[\"WGS 84\"]"));
        assert!(!is_geographic_wkt(""));
    }

    #[test]
    fn test_nztm_by_parameters() {
        let wkt = "PROJCS[\"Custom\",GEOGCS[\"GCS\"],PROJECTION[\"Transverse_Mercator\"],PARAMETER[\"False_Easting\",1600000.0],PARAMETER[\"Central_Meridian\",173.0]]";
        assert!(is_nztm_wkt(wkt));
        let utm = "PROJCS[\"WGS_1984_UTM_Zone_59S\",GEOGCS[\"GCS\"],PROJECTION[\"Transverse_Mercator\"],PARAMETER[\"False_Easting\",500000.0],PARAMETER[\"Central_Meridian\",171.0]]";
        assert!(!is_nztm_wkt(utm));
    }
}
