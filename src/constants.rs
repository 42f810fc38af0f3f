//! Static dataset catalog and the filename-to-dataset-kind mapping.
//! These mirror the indicator pages published by the university portal.

use crate::domain::DatasetKind;

/// Base URL of the indicators site the raw files were downloaded from.
pub const BASE_URL: &str = "https://indicadores.uabc.mx";

/// One downloadable dataset on the indicators site.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    pub name: &'static str,
    pub url_path: &'static str,
    pub description: &'static str,
    pub priority: u8,
}

/// Every dataset the scraper is expected to download. Used by the download
/// validator for coverage checks and listed by the `datasets` subcommand.
pub const DATASET_CATALOG: &[DatasetSource] = &[
    DatasetSource {
        name: "Alumnos_Licenciatura_Historico",
        url_path: "/indicadores/historicos/historico_AL/historico_AL",
        description: "Histórico de alumnos de licenciatura",
        priority: 1,
    },
    DatasetSource {
        name: "Alumnos_Posgrado_Historico",
        url_path: "/indicadores/historicos/historico_AP/historico_AP",
        description: "Histórico de alumnos de posgrado",
        priority: 1,
    },
    DatasetSource {
        name: "Personal_Academico_Historico",
        url_path: "/indicadores/historicos/historico_PA/historico_PA",
        description: "Histórico de personal académico",
        priority: 1,
    },
    DatasetSource {
        name: "Personal_Administrativo_Historico",
        url_path: "/indicadores/historicos/historico_PAS/historico_PAS",
        description: "Histórico de personal administrativo y de servicios",
        priority: 2,
    },
    DatasetSource {
        name: "Programas_Licenciatura",
        url_path: "/indicadores/programasEducativosLicenciatura",
        description: "Programas educativos de licenciatura",
        priority: 2,
    },
    DatasetSource {
        name: "Programas_Licenciatura_Historico",
        url_path: "/indicadores/historicos/historico_PEL/historico_PEL",
        description: "Histórico de programas educativos de licenciatura",
        priority: 1,
    },
    DatasetSource {
        name: "Programas_Posgrado",
        url_path: "/indicadores/programasEducativosPosgrado",
        description: "Programas educativos de posgrado",
        priority: 2,
    },
    DatasetSource {
        name: "Programas_Posgrado_Historico",
        url_path: "/indicadores/historicos/historico_PEP/historico_PEP",
        description: "Histórico de programas educativos de posgrado",
        priority: 1,
    },
    DatasetSource {
        name: "Relacion_AlumnosProfesor",
        url_path: "/indicadores/PersonalAcademico/relacionAlumno_pa",
        description: "Relación alumnos por profesor",
        priority: 1,
    },
    DatasetSource {
        name: "Personal_SNI_Historico",
        url_path: "/indicadores/historicos/historico_PASNI/historico_PASNI",
        description: "Histórico de personal académico en el SNI",
        priority: 1,
    },
    DatasetSource {
        name: "Cuerpos_Academicos_Historico",
        url_path: "/indicadores/cuerposAcademicos/",
        description: "Cuerpos académicos",
        priority: 1,
    },
];

/// Filename substrings mapped to dataset kinds. First match wins; file names
/// carry a trailing timestamp so matching is by substring, not equality.
const KIND_MAP: &[(&str, DatasetKind)] = &[
    ("Alumnos_Licenciatura_Historico", DatasetKind::StudentEnrollment),
    ("Alumnos_Posgrado_Historico", DatasetKind::StudentEnrollment),
    ("Personal_Academico_Historico", DatasetKind::AcademicStaff),
    ("Personal_SNI_Historico", DatasetKind::ResearchStaff),
    ("Cuerpos_Academicos_Historico", DatasetKind::AcademicBodies),
    ("CuerposAcademicos_UnidadAcademica", DatasetKind::AcademicBodies),
    ("CuerposAcademicos_AreaConocimiento", DatasetKind::AcademicBodies),
    ("Programas_Licenciatura_Historico", DatasetKind::ProgramListing),
    ("Programas_Posgrado_Historico", DatasetKind::ProgramListing),
    ("Programas_Licenciatura", DatasetKind::ProgramListing),
    ("Programas_Posgrado", DatasetKind::ProgramListing),
    ("Relacion_AlumnosProfesor", DatasetKind::StaffRatio),
];

/// Resolve the dataset kind for a raw file name. Unrecognized names fall
/// back to the generic cleaning plan.
pub fn dataset_kind_for_file(file_name: &str) -> DatasetKind {
    for (pattern, kind) in KIND_MAP {
        if file_name.contains(pattern) {
            return *kind;
        }
    }
    DatasetKind::Generic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_file_names_resolve() {
        assert_eq!(
            dataset_kind_for_file("Alumnos_Licenciatura_Historico_20240115.xls"),
            DatasetKind::StudentEnrollment
        );
        assert_eq!(
            dataset_kind_for_file("Relacion_AlumnosProfesor_20240115.xls"),
            DatasetKind::StaffRatio
        );
        assert_eq!(
            dataset_kind_for_file("CuerposAcademicos_AreaConocimiento_20240115.xls"),
            DatasetKind::AcademicBodies
        );
    }

    #[test]
    fn test_unknown_file_name_is_generic() {
        assert_eq!(
            dataset_kind_for_file("Algo_Totalmente_Distinto.csv"),
            DatasetKind::Generic
        );
    }

    #[test]
    fn test_historic_patterns_win_over_prefixes() {
        // "Programas_Licenciatura_Historico" must not be swallowed by the
        // shorter "Programas_Licenciatura" entry; both map to the same kind,
        // but ordering keeps the mapping unambiguous.
        assert_eq!(
            dataset_kind_for_file("Programas_Licenciatura_Historico_1.xlsx"),
            DatasetKind::ProgramListing
        );
    }
}
